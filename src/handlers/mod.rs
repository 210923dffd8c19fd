pub(crate) mod get_block_complete;
pub(crate) mod get_blocks;
pub(crate) mod get_categories;
pub(crate) mod get_db_status;
pub(crate) mod get_health;
pub(crate) mod get_next_block;
pub(crate) mod get_next_question;
pub(crate) mod get_questions;
pub(crate) mod get_results;
pub(crate) mod get_start_question;
pub(crate) mod post_checkbox_vote;
pub(crate) mod post_other_response;
pub(crate) mod post_vote;
pub(crate) mod util;
