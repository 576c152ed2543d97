pub mod tag;

pub use tag::{
    diff_tag_sets, find_by_name_ci, matching_tags, missing_tag_ids, validate_tag_names, Tag,
    TAG_COLUMNS,
};
