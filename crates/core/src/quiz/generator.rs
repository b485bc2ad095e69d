//! LLM-backed quiz question generation.
//!
//! The prompts are kept in Portuguese: the generated questions carry
//! Portuguese field names end-to-end (see `GeneratedQuestion`), and the
//! model answers in the language it is prompted in.

use std::sync::Arc;

use async_trait::async_trait;
use chronos_domain::constants::DEFAULT_QUIZ_QUESTION_COUNT;
use chronos_domain::{GeneratedQuestion, Result};
use serde::Deserialize;
use tracing::info;

const SYSTEM_PROMPT: &str = r#"
Você é um gerador de perguntas de múltipla escolha educativas para um aplicativo de estudos.

Seu papel é criar perguntas **claras, desafiadoras e educativas**, voltadas ao aprendizado real.

Regras gerais:
1. Gere perguntas apenas sobre temas de estudo (ex: matemática, física, química, biologia, história, geografia, literatura, idiomas, etc.).
2. Cada pergunta deve ter uma **única resposta correta**.
3. Classifique a dificuldade como **fácil**, **médio** ou **difícil**.
4. Retorne as perguntas no formato JSON abaixo:

[
  {
    "tema": "<tema>",
    "dificuldade": "<fácil | médio | difícil>",
    "pergunta": "<texto da pergunta>",
    "alternativas": [
      "A) ...",
      "B) ...",
      "C) ...",
      "D) ..."
    ],
    "resposta_correta": "C",
    "explicacao": "<explicação breve, clara e objetiva sobre por que esta alternativa é correta>"
  }
]

Diretrizes para qualidade:
- **Não deixe a resposta correta óbvia.**
  - Todas as alternativas devem ter tamanho e estrutura similares.
  - Evite que a correta pareça mais longa, mais técnica ou mais explicativa.
  - Use **distratores plausíveis**: respostas incorretas mas que pareçam razoáveis.
- **Dificuldade:**
  - Fácil → conceitos básicos ou de definição direta.
  - Médio → aplicação ou interpretação de conceitos.
  - Difícil → análise, dedução, correlação entre ideias ou cálculos.
- **Varie o estilo das perguntas** (ex: teóricas, de aplicação, conceituais, analíticas).
- **Nunca revele a resposta ou explicação no enunciado.**
- **Explique apenas no campo "explicacao"** após o JSON.
- Gere sempre **JSON puro e válido**, sem texto fora do JSON.
- Se o tema não for educativo, responda:
  {"erro": "tema inválido, apenas conteúdos educativos são permitidos"}
"#;

/// Request payload for question generation.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRequest {
    #[serde(rename = "tema")]
    pub topic: String,
    #[serde(rename = "dificuldade")]
    pub difficulty: String,
    #[serde(rename = "quantidade", default)]
    pub count: u8,
}

/// Trait for the LLM provider that turns prompts into questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(&self, system: &str, user: &str) -> Result<Vec<GeneratedQuestion>>;
}

/// Builds the prompts and delegates to the configured provider.
pub struct AiQuizService {
    generator: Arc<dyn QuestionGenerator>,
}

impl AiQuizService {
    pub fn new(generator: Arc<dyn QuestionGenerator>) -> Self {
        Self { generator }
    }

    pub async fn generate_questions(&self, req: QuestionRequest) -> Result<Vec<GeneratedQuestion>> {
        let user_prompt = build_user_prompt(&req);
        let questions = self.generator.generate(SYSTEM_PROMPT, &user_prompt).await?;
        info!(count = questions.len(), topic = %req.topic, "quiz questions generated");
        Ok(questions)
    }
}

fn build_user_prompt(req: &QuestionRequest) -> String {
    let count = if req.count == 0 { DEFAULT_QUIZ_QUESTION_COUNT } else { req.count };

    format!(
        "Gere {count} perguntas de múltipla escolha sobre o tema \"{}\" com dificuldade \"{}\". \
         As perguntas devem seguir o formato especificado no system prompt, incluindo o campo 'explicacao'.",
        req.topic, req.difficulty,
    )
}
