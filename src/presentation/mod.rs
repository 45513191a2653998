//! Pure formatters turning domain entities into styled display columns.
//! Each function returns one ordered list of styled lines per input row,
//! suitable for column-aligned rendering by a table widget.

pub mod branches;
pub mod commits;
pub mod files;
pub mod lists;
pub mod style;

pub use branches::{branch_display_lines, branch_list_display_lines};
pub use commits::commit_list_display_lines;
pub use files::{commit_file_display_lines, status_file_display_lines};
pub use lists::{
    menu_display_lines, remote_branch_display_lines, remote_display_lines, stash_display_lines,
    submodule_display_lines, tag_display_lines,
};
