pub mod draft_repo;

pub use draft_repo::DraftRepo;
