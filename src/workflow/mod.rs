pub mod line_grammar;
pub mod question_state;

pub use line_grammar::{LineGrammar, OcrGrammar, OptionLine, ParsedLine, QuestionHeader, WordGrammar};
pub use question_state::{collect_questions, PendingQuestion, QuestionState};
