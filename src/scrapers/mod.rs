//! Site-specific page extraction and record validation

pub mod naver_terms;
pub mod record;
