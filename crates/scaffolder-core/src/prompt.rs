//! Prompt collaborator contract
//!
//! The renderer hands materialized questions to a [`Prompter`] once and gets
//! an answer set back. The cliclack front-end lives in `tui`; this module
//! ships the non-interactive implementation.

use crate::answers::AnswerSet;
use crate::config::{Question, QuestionKind};
use crate::error::Result;
use serde_json::Value;

/// Asks questions and returns the answers keyed by question name
pub trait Prompter {
    fn ask(&mut self, questions: &[Question]) -> Result<AnswerSet>;
}

impl<P: Prompter + ?Sized> Prompter for &mut P {
    fn ask(&mut self, questions: &[Question]) -> Result<AnswerSet> {
        (**self).ask(questions)
    }
}

/// Non-interactive prompter for `--yes` runs
///
/// Answers only the questions that carry a default. The rest stay
/// unanswered, so data already supplied by the caller is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn ask(&mut self, questions: &[Question]) -> Result<AnswerSet> {
        Ok(questions
            .iter()
            .filter(|q| q.has_default())
            .map(|q| (q.name.clone(), default_answer(q)))
            .collect())
    }
}

/// The answer a question gets when the user just accepts it
pub fn default_answer(question: &Question) -> Value {
    if question.has_default() {
        if let Some(value) = &question.default {
            return value.clone();
        }
    }
    match question.kind {
        QuestionKind::Input => Value::String(String::new()),
        QuestionKind::Confirm => Value::Bool(false),
        QuestionKind::Select => question
            .choices
            .first()
            .map(|c| Value::String(c.value().to_string()))
            .unwrap_or(Value::Null),
        QuestionKind::Multiselect => Value::Array(Vec::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Choice;
    use serde_json::json;

    #[test]
    fn test_defaults_prompter_answers_only_defaulted_questions() {
        let mut named = Question::input("name");
        named.default = Some(json!("demo"));

        let mut cleared = Question::input("author");
        cleared.default = Some(Value::Null);

        let answers = DefaultsPrompter
            .ask(&[named, Question::input("empty"), cleared])
            .unwrap();

        assert_eq!(Value::Object(answers), json!({"name": "demo"}));
    }

    #[test]
    fn test_default_answer_kind_fallbacks() {
        let mut confirm = Question::input("docker");
        confirm.kind = QuestionKind::Confirm;

        let mut select = Question::input("license");
        select.kind = QuestionKind::Select;
        select.choices = vec![Choice::Plain("MIT".into()), Choice::Plain("ISC".into())];

        let mut multi = Question::input("features");
        multi.kind = QuestionKind::Multiselect;
        multi.choices = vec![Choice::Plain("a".into())];

        assert_eq!(default_answer(&Question::input("empty")), json!(""));
        assert_eq!(default_answer(&confirm), json!(false));
        assert_eq!(default_answer(&select), json!("MIT"));
        assert_eq!(default_answer(&multi), json!([]));
    }
}
