/// Reserved option code that asks the voter for a free-text answer.
pub const OTHER_OPTION_CODE: &str = "OTHER";

/// Single-select questions record one `responses` row per vote, checkbox
/// questions one `checkbox_responses` row per selected option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ::serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Single,
    Multi,
}

impl QuestionKind {
    pub fn from_check_box(check_box: bool) -> QuestionKind {
        if check_box {
            QuestionKind::Multi
        } else {
            QuestionKind::Single
        }
    }

    pub fn is_check_box(&self) -> bool {
        *self == QuestionKind::Multi
    }
}

pub fn is_other_code(code: &str) -> bool {
    code == OTHER_OPTION_CODE
}

/// A user id is only meaningful when non-empty; the frontend sends an
/// empty string for anonymous voters.
pub fn identified_user(user_id: Option<&str>) -> Option<&str> {
    user_id.filter(|user_id| !user_id.is_empty())
}

#[derive(::serde::Serialize, ::sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct Category {
    pub id: i32,
    pub category_name: String,
    pub category_text: Option<String>,
    pub category_text_long: Option<String>,
}

#[derive(::serde::Serialize, ::sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct Block {
    pub id: Option<i32>,
    pub category_id: i32,
    pub block_number: i32,
    pub block_text: Option<String>,
    pub version: Option<String>,
    pub uuid: Option<String>,
}

#[derive(::sqlx::FromRow, Clone, Debug)]
pub struct QuestionRow {
    pub id: i32,
    pub question_id: String,
    pub question_number: Option<i32>,
    pub question_text: String,
    pub category_id: i32,
    pub category_name: Option<String>,
    pub is_start_question: bool,
    pub parent_question_id: Option<String>,
    pub check_box: bool,
    pub block_number: Option<i32>,
    pub color_code: Option<String>,
}

impl QuestionRow {
    pub fn kind(&self) -> QuestionKind {
        QuestionKind::from_check_box(self.check_box)
    }
}

#[derive(::serde::Serialize, ::sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct OptionRow {
    pub id: i32,
    #[serde(rename = "text")]
    pub option_text: String,
    #[serde(rename = "code")]
    pub option_code: String,
    pub response_message: Option<String>,
    pub companion_advice: Option<String>,
    pub next_question_id: Option<String>,
}

/// Shape served to the frontend for a question and its options.
#[derive(::serde::Serialize, Clone, Debug)]
pub struct QuestionView {
    pub id: i32,
    pub question_id: String,
    pub text: String,
    pub category: Option<String>,
    pub category_id: String,
    pub color_code: Option<String>,
    pub check_box: bool,
    pub block: Option<i32>,
    pub options: Vec<OptionRow>,
}

impl QuestionView {
    pub fn new(question: QuestionRow, options: Vec<OptionRow>) -> Self {
        QuestionView {
            id: question.id,
            question_id: question.question_id,
            text: question.question_text,
            category: question.category_name,
            category_id: question.category_id.to_string(),
            color_code: question.color_code,
            check_box: question.check_box,
            block: question.block_number,
            options,
        }
    }
}

#[derive(::sqlx::FromRow, Clone, Debug, PartialEq)]
pub struct User {
    pub uuid: String,
    pub year_of_birth: Option<i32>,
    pub referred_by: Option<String>,
}

/// Identity fields shared by every submission that may lazily create a
/// user row.
#[derive(::serde::Deserialize, Clone, Debug, Default)]
pub struct Voter {
    pub uuid: Option<String>,
    pub year_of_birth: Option<i32>,
    pub referred_by: Option<String>,
}

impl Voter {
    pub fn anonymous() -> Self {
        Voter::default()
    }

    pub fn user_id(&self) -> Option<&str> {
        identified_user(self.uuid.as_deref())
    }
}

#[derive(::serde::Deserialize, Clone, Debug)]
pub struct Vote {
    pub question_id: String,
    pub option_code: String,
    pub session_id: Option<String>,
    #[serde(flatten)]
    pub voter: Voter,
}

#[derive(::serde::Deserialize, Clone, Debug)]
pub struct CheckboxVote {
    pub question_id: String,
    pub option_codes: Vec<String>,
    pub other_text: Option<String>,
    #[serde(flatten)]
    pub voter: Voter,
}

#[derive(::serde::Deserialize, Clone, Debug)]
pub struct OtherResponse {
    pub question_id: String,
    pub question_text: String,
    pub other_text: String,
    #[serde(flatten)]
    pub voter: Voter,
}

#[derive(::serde::Serialize, ::serde::Deserialize, Clone, Debug, PartialEq)]
pub struct SessionEntry {
    pub question_id: String,
    pub option_code: String,
}

#[derive(Debug, PartialEq)]
pub enum VoteOutcome {
    Recorded,
    AlreadyVoted,
    OtherNeeded,
}

impl VoteOutcome {
    pub fn status(&self) -> &'static str {
        match self {
            VoteOutcome::Recorded => "success",
            VoteOutcome::AlreadyVoted => "already_voted",
            VoteOutcome::OtherNeeded => "other_needed",
        }
    }
}
