//! Repository layer: one interface per entity over the shared pool.

mod comments;
mod follows;
mod groups;
mod posts;
mod users;

pub use comments::{CommentRepo, CommentRow};
pub use follows::FollowRepo;
pub use groups::GroupRepo;
pub use posts::{PostRepo, PostRow};
pub use users::UserRepo;
