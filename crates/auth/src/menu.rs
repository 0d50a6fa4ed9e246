//! Menu records and the sidebar tree built from them.
//!
//! The backend returns menus as a flat list with parent references. The tree
//! is derived on the client: filter by what the viewer may see, then nest by
//! `parent_id`, ordering siblings by `sort`.

use core::str::FromStr;
use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use midplat_core::{DomainError, Entity, MenuId};

use crate::{Permission, PermissionContext, UserRole};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuType {
    #[default]
    Menu,
    Button,
}

/// Surface a menu belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Admin,
    H5,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Admin => "admin",
            Platform::H5 => "h5",
        }
    }
}

impl core::fmt::Display for Platform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Platform::Admin),
            "h5" => Ok(Platform::H5),
            other => Err(DomainError::validation(format!(
                "platform must be one of: admin, h5 (got '{other}')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuStatus {
    #[default]
    Active,
    Disabled,
}

/// A menu record as stored by the backend. Children are never stored; they are
/// derived by [`build_tree`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: MenuId,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<MenuId>,
    #[serde(default)]
    pub sort: i32,
    #[serde(rename = "type", default)]
    pub kind: MenuType,
    #[serde(default)]
    pub platform: Platform,
    #[serde(default)]
    pub status: MenuStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission: Option<Permission>,
    #[serde(
        default,
        deserialize_with = "blank_role_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<UserRole>,
}

/// `""` (or whitespace) means no role restriction, matching how an empty
/// permission is read. Any other unrecognised role stays [`UserRole::Unknown`].
fn blank_role_as_none<'de, D>(de: D) -> Result<Option<UserRole>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw
        .filter(|s| !s.trim().is_empty())
        .map(|s| s.parse().unwrap_or(UserRole::Unknown)))
}

impl Entity for MenuItem {
    type Id = MenuId;

    fn id(&self) -> MenuId {
        self.id
    }
}

impl MenuItem {
    /// Both restrictions, when set, must pass. An empty permission string is
    /// treated as no restriction.
    pub fn is_visible_to(&self, ctx: &PermissionContext) -> bool {
        let permission_ok = match &self.permission {
            Some(p) if !p.as_str().is_empty() => ctx.has_permission(p),
            _ => true,
        };
        let role_ok = match self.role {
            Some(role) => ctx.has_role(role),
            None => true,
        };
        permission_ok && role_ok
    }
}

/// A menu item with its derived children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuNode {
    #[serde(flatten)]
    pub item: MenuItem,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<MenuNode>,
}

impl MenuNode {
    /// Active if the node's own path is `current_path`, or any descendant is.
    pub fn is_active(&self, current_path: &str) -> bool {
        (!self.item.path.is_empty() && self.item.path == current_path)
            || self.children.iter().any(|child| child.is_active(current_path))
    }

    fn count(&self) -> usize {
        1 + self.children.iter().map(MenuNode::count).sum::<usize>()
    }

    fn find(&self, id: MenuId) -> Option<&MenuNode> {
        if self.item.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }
}

/// Result of nesting a flat menu list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MenuTree {
    pub roots: Vec<MenuNode>,
    /// Items that could not be placed: unknown parent, a parent cycle, or a
    /// duplicated id.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub orphans: Vec<MenuId>,
}

impl MenuTree {
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of placed nodes.
    pub fn len(&self) -> usize {
        self.roots.iter().map(MenuNode::count).sum()
    }

    pub fn find(&self, id: MenuId) -> Option<&MenuNode> {
        self.roots.iter().find_map(|root| root.find(id))
    }

    /// Ids from the root down to the node whose path is `current_path`; empty
    /// when no node matches. The sidebar expands exactly these branches.
    pub fn active_trail(&self, current_path: &str) -> Vec<MenuId> {
        let mut trail = Vec::new();
        let mut level = self.roots.as_slice();
        while let Some(node) = level.iter().find(|n| n.is_active(current_path)) {
            trail.push(node.item.id);
            if node.item.path == current_path {
                break;
            }
            level = node.children.as_slice();
        }
        trail
    }
}

/// Items the viewer may see, in upstream order.
pub fn filter_visible(items: &[MenuItem], ctx: &PermissionContext) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.is_visible_to(ctx))
        .cloned()
        .collect()
}

/// Items belonging to `platform`.
pub fn for_platform(items: &[MenuItem], platform: Platform) -> Vec<MenuItem> {
    items
        .iter()
        .filter(|item| item.platform == platform)
        .cloned()
        .collect()
}

/// Drops disabled items.
pub fn without_disabled(items: Vec<MenuItem>) -> Vec<MenuItem> {
    items
        .into_iter()
        .filter(|item| item.status == MenuStatus::Active)
        .collect()
}

/// Codes of the button-type items directly under `page`, in `sort` order.
pub fn buttons_of(items: &[MenuItem], page: MenuId) -> Vec<&str> {
    let mut buttons: Vec<&MenuItem> = items
        .iter()
        .filter(|item| item.kind == MenuType::Button && item.parent_id == Some(page))
        .collect();
    buttons.sort_by_key(|item| item.sort);
    buttons.into_iter().map(|item| item.code.as_str()).collect()
}

/// Nest `items` by `parent_id`, siblings ordered by ascending `sort`.
///
/// Siblings with equal `sort` keep their upstream order. Each id is placed at
/// most once, so malformed parent chains cannot recurse without bound; whatever
/// is not reachable from the root ends up in [`MenuTree::orphans`].
pub fn build_tree(items: Vec<MenuItem>) -> MenuTree {
    let tree = nest(items);
    if !tree.orphans.is_empty() {
        tracing::warn!(orphans = ?tree.orphans, "menu items not reachable from the root were dropped");
    }
    tree
}

fn nest(items: Vec<MenuItem>) -> MenuTree {
    let mut by_parent: HashMap<Option<MenuId>, Vec<usize>> = HashMap::new();
    for (idx, item) in items.iter().enumerate() {
        by_parent.entry(item.parent_id).or_default().push(idx);
    }
    for siblings in by_parent.values_mut() {
        siblings.sort_by_key(|&idx| items[idx].sort);
    }

    let mut slots: Vec<Option<MenuItem>> = items.into_iter().map(Some).collect();
    let mut placed = HashSet::new();
    let roots = attach(None, &by_parent, &mut slots, &mut placed);
    let orphans = slots.iter().flatten().map(Entity::id).collect();

    MenuTree { roots, orphans }
}

fn attach(
    parent: Option<MenuId>,
    by_parent: &HashMap<Option<MenuId>, Vec<usize>>,
    slots: &mut [Option<MenuItem>],
    placed: &mut HashSet<MenuId>,
) -> Vec<MenuNode> {
    let Some(siblings) = by_parent.get(&parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(siblings.len());
    for &idx in siblings {
        let Some(id) = slots[idx].as_ref().map(Entity::id) else {
            continue;
        };
        if !placed.insert(id) {
            continue;
        }
        let Some(item) = slots[idx].take() else {
            continue;
        };
        let children = attach(Some(id), by_parent, slots, placed);
        nodes.push(MenuNode { item, children });
    }
    nodes
}

/// Filter pass followed by the tree pass.
///
/// Only chains that are broken in `items` itself (missing parent, cycle,
/// duplicated id) are warned about and kept in [`MenuTree::orphans`]. Items
/// dropped because an ancestor is hidden from the viewer are an ordinary
/// outcome of the filter and are only logged at debug level.
pub fn build_menu_tree(items: &[MenuItem], ctx: &PermissionContext) -> MenuTree {
    let malformed: HashSet<MenuId> = build_tree(items.to_vec()).orphans.into_iter().collect();

    let mut tree = nest(filter_visible(items, ctx));
    let (orphans, hidden): (Vec<MenuId>, Vec<MenuId>) = tree
        .orphans
        .into_iter()
        .partition(|id| malformed.contains(id));
    if !hidden.is_empty() {
        tracing::debug!(?hidden, "menu items under a hidden parent were dropped");
    }
    tree.orphans = orphans;
    tree
}
