pub mod problem_card;
pub mod progress_bar;
pub mod summary_banner;
pub mod tab_bar;
