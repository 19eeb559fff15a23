//! Prompt builders for the two-step generation flow
//!
//! Step one extracts a numbered requirements list from a source document,
//! step two refines that list into the import JSON shape. The wording is
//! tuned against gpt-4o-mini and deliberately left in Russian.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"```json\s*([\s\S]*?)\s*```") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

pub const EXTRACTION_SYSTEM: &str = "Ты — аналитик, извлекающий требования из ТЗ.";

pub const REFINEMENT_SYSTEM: &str =
    "Ты — технический аналитик, формирующий задачи для импорта в Jira.";

const EXAMPLE_JSON: &str = r#"{
  "projects": [
    {
      "key": "{key}",
      "issues": [
        {
          "summary": "1. Общие функциональные требования",
          "issueType": "Эпик",
          "description": "Базовые требования к разработке и функционированию сайта",
          "externalId": "1"
        },
        {
          "summary": "1.1. Разработка сайта на современном языке веб-программирования",
          "issueType": "История",
          "description": "Использование современных технологий для разработки сайта",
          "externalId": "2"
        },
        {
          "summary": "1.1.1. Минимальное время загрузки и отображения страниц",
          "issueType": "Подзадача",
          "description": "Оптимизация производительности сайта",
          "externalId": "3"
        }
      ]
    }
  ]
}"#;

/// User message for the extraction step, wrapping the source document.
pub fn extraction_user(document: &str) -> String {
    format!(
        "Вот техническое задание:\n{document}\n\n\
         Извлеки функциональные требования и представь их в виде иерархического списка: \
         1. Общие функциональные требования, 2. Функциональные возможности, 3. Пользовательские роли и т.д. \
         Вложенность списка максимум до третьего уровня (1.1. 1.1.1.). Чeтвёртый уровень не писать, а переместить в третий."
    )
}

/// User message for the refinement step, embedding the example shape and
/// the target project key.
pub fn refinement_user(project_key: &str, requirements: &str) -> String {
    let example = EXAMPLE_JSON.replace("{key}", project_key);
    format!(
        "Вот список функциональных требований:\n\n{requirements}\n\n\
         Преобразуй в JSON Jira по примеру:\n\n{example}\
         Инструкция:\n\
         - Используй ключ проекта {project_key}.\n\
         - Каждый верхний уровень — это Эпик.\n\
         - Первый вложенный уровень — История.\n\
         - Второй вложенный уровень — Подзадача.\n\
         - Четвёртые уровни включай как описание в родительский пункт.\n\
         - Поле summary — это название требования.\n\
         - Поле issueType указывается на русском языке: Эпик, История, Подзадача.\n\
         - Все элементы в JSON должны иметь уникальный externalId.\n\
         - Описание (description) заполняй по смыслу, если возможно.\n"
    )
}

/// Strips a ```json ... ``` wrapper the model tends to add around replies.
/// Text without a fence passes through trimmed.
pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE
        .replace_all(text.trim(), "$1")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_fenced_json() {
        let reply = "```json\n{\"projects\": []}\n```";
        assert_eq!(strip_code_fences(reply), "{\"projects\": []}");
    }

    #[test]
    fn test_strip_keeps_unfenced_text() {
        let reply = "  {\"projects\": []}  ";
        assert_eq!(strip_code_fences(reply), "{\"projects\": []}");
    }

    #[test]
    fn test_strip_leaves_surrounding_prose() {
        let reply = "Вот результат:\n```json\n{}\n```";
        assert_eq!(strip_code_fences(reply), "Вот результат:\n{}");
    }

    #[test]
    fn test_refinement_embeds_project_key() {
        let user = refinement_user("WEB", "1. Требование");
        assert!(user.contains("\"key\": \"WEB\""));
        assert!(user.contains("Используй ключ проекта WEB."));
        assert!(user.contains("1. Требование"));
    }

    #[test]
    fn test_extraction_embeds_document() {
        let user = extraction_user("Сайт должен быстро загружаться.");
        assert!(user.contains("Сайт должен быстро загружаться."));
        assert!(user.starts_with("Вот техническое задание:"));
    }
}
