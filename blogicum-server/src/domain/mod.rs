pub(crate) mod authorization;
pub(crate) mod comment;
pub(crate) mod error;
pub(crate) mod post;
pub(crate) mod publication;
pub(crate) mod taxonomy;
pub(crate) mod user;
pub(crate) mod viewer;
pub(crate) mod visibility;
