//! `midplat-auth` — permission resolution and menu visibility for the console.
//!
//! Everything here is pure: no HTTP, no storage. The console crate feeds it
//! the user and menu records it fetched from the backend.

pub mod authorize;
pub mod context;
pub mod menu;
pub mod permissions;
pub mod policy;
pub mod roles;
pub mod user;

pub use authorize::{AuthzError, authorize, explain_authorization};
pub use context::PermissionContext;
pub use menu::{MenuItem, MenuNode, MenuStatus, MenuTree, MenuType, Platform, build_menu_tree};
pub use permissions::Permission;
pub use policy::RolePolicy;
pub use roles::UserRole;
pub use user::CurrentUser;
