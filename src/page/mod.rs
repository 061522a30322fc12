//! The smaller page behaviours around the two animated layers.
//!
//! Each module binds to its elements through the [`dom`](crate::dom) traits
//! and quietly does nothing when they are missing, so the same code runs on
//! every page of the site.

pub mod back_to_top;
pub mod counter;
pub mod filter;
pub mod footer;
pub mod menu;
pub mod navbar;
pub mod reveal;
pub mod typing;

pub use back_to_top::BackToTop;
pub use counter::StatCounter;
pub use filter::YearFilter;
pub use footer::set_footer_year;
pub use menu::MobileMenu;
pub use navbar::Navbar;
pub use reveal::ScrollReveal;
pub use typing::TypingEffect;
