//! Prompt construction for the vision chat providers

/// Instructions sent ahead of every question list
pub const SYSTEM_MESSAGE: &str = r#"You are given an image and a series of question(s). Answer as succinctly as possible. Do not explain your reasoning for the answer, or add any additional wording, just give the answer.

For example, if the question is "What is the date?" and the answer is "January 1, 2022", you would respond with "January 1, 2022" and not "The date is January 1, 2022".

The questions have the following format:

QUESTIONS:
1. ...
2. ...
...

You will answer each question in order. If the answer is a numeric value just return that numeric value. Use the following format for your answer:

ANSWERS:
1. ...
2. ...
..."#;

/// Render questions as `QUESTIONS:\n1. ...\n2. ...\n`
pub fn build_user_message(questions: &[String]) -> String {
    let mut message = String::from("QUESTIONS:\n");
    for (i, question) in questions.iter().enumerate() {
        message.push_str(&format!("{}. {}\n", i + 1, question));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_user_message() {
        let questions = vec![
            "What is the bill total?".to_string(),
            "What is the date?".to_string(),
        ];
        assert_eq!(
            build_user_message(&questions),
            "QUESTIONS:\n1. What is the bill total?\n2. What is the date?\n"
        );
    }

    #[test]
    fn test_system_message_requests_numbered_answers() {
        assert!(SYSTEM_MESSAGE.starts_with("You are given an image"));
        assert!(SYSTEM_MESSAGE.ends_with("ANSWERS:\n1. ...\n2. ...\n..."));
    }
}
