//! Marker collection and marker manifests.
//!
//! A type is marked when a unit contains either a struct deriving `Record`
//! with `#[record(forbid_direct_construction)]`, or an
//! `impl DirectConstructionForbidden for T` item (what the derive expands
//! to). Manifests carry markers between crates: a build script writes the
//! markers it collected, and dependents merge them in.
//!
//! Types are identified by their simple name. Two marked types with the same
//! name in different modules share a marker. Other names for a type, from
//! `use ... as Name` renames and `type Name = ...;` aliases, are collected
//! alongside the markers and followed when a name is looked up.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};

use camino::Utf8Path;
use fresh_defaults_policy::{DEFAULT_FACTORY_NAME, GuardMarker};
use serde::{Deserialize, Serialize};
use syn::punctuated::Punctuated;
use syn::visit::{self, Visit};
use syn::{Attribute, Ident, Lit, Path, Token, UseTree};

use crate::GuardError;
use crate::fs::{read_utf8, write_utf8};

/// Manifest format version written by this crate.
pub const MANIFEST_VERSION: u32 = 1;

/// Alias name to the names it stands for.
type AliasMap = BTreeMap<String, BTreeSet<String>>;

/// On-disk form of a [`MarkerSet`].
#[derive(Debug, Serialize, Deserialize)]
struct Manifest {
    version: u32,
    markers: Vec<GuardMarker>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    aliases: AliasMap,
}

/// Markers keyed by type name, with the aliases that lead to them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarkerSet {
    markers: BTreeMap<String, GuardMarker>,
    aliases: AliasMap,
}

impl MarkerSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `marker`, merging with any marker already held for its type.
    ///
    /// A type stays active once any source marks it active, and a factory
    /// suggestion is kept once any source names one.
    pub fn insert(&mut self, marker: GuardMarker) {
        match self.markers.entry(marker.type_id.clone()) {
            Entry::Occupied(mut slot) => {
                let existing = slot.get_mut();
                existing.active |= marker.active;
                if existing.factory.is_none() {
                    existing.factory = marker.factory;
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(marker);
            }
        }
    }

    /// Records that `alias` may name the type called `target`.
    ///
    /// An alias can stand for several types when different units rename
    /// different types to the same name; lookups follow all of them.
    pub fn insert_alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        let alias_name = alias.into();
        let target_name = target.into();
        if alias_name == "_" || alias_name == target_name {
            return;
        }
        self.aliases.entry(alias_name).or_default().insert(target_name);
    }

    /// Merges every marker and alias of `other`.
    pub fn merge(&mut self, other: Self) {
        for marker in other.markers.into_values() {
            self.insert(marker);
        }
        for (alias, targets) in other.aliases {
            self.aliases.entry(alias).or_default().extend(targets);
        }
    }

    /// Marker held for exactly `type_id`, without following aliases.
    #[must_use]
    pub fn get(&self, type_id: &str) -> Option<&GuardMarker> {
        self.markers.get(type_id)
    }

    /// Active marker that `name` refers to.
    ///
    /// A name that is itself marked wins; otherwise its aliases are
    /// followed, through chains of aliases, until a marked type is found.
    #[must_use]
    pub fn enforced<'a>(&'a self, name: &'a str) -> Option<&'a GuardMarker> {
        let mut pending = vec![name];
        let mut seen = BTreeSet::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(marker) = self.markers.get(current).filter(|marker| marker.active) {
                return Some(marker);
            }
            if let Some(targets) = self.aliases.get(current) {
                pending.extend(targets.iter().map(String::as_str));
            }
        }
        None
    }

    /// Whether constructing a value through `name` is forbidden.
    #[must_use]
    pub fn is_forbidden(&self, name: &str) -> bool {
        self.enforced(name).is_some()
    }

    /// Markers in type-name order.
    pub fn iter(&self) -> impl Iterator<Item = &GuardMarker> {
        self.markers.values()
    }

    /// Number of marked types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.markers.len()
    }

    /// Whether no type is marked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Adds the markers and aliases declared in `file`.
    pub fn collect_from(&mut self, file: &syn::File) {
        let mut collector = Collector { markers: self };
        collector.visit_file(file);
    }

    /// Aliases that lead to an active marker; the others are not persisted.
    fn enforced_aliases(&self) -> AliasMap {
        self.aliases
            .iter()
            .filter(|(alias, _)| self.is_forbidden(alias))
            .map(|(alias, targets)| (alias.clone(), targets.clone()))
            .collect()
    }

    /// Reads a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Io`] when the file cannot be read and
    /// [`GuardError::Manifest`] when it is not a valid manifest or was
    /// written with another format version.
    pub fn load(path: &Utf8Path) -> Result<Self, GuardError> {
        let text = read_utf8(path)?;
        let manifest_error = |source: serde_json::Error| GuardError::Manifest {
            path: path.to_path_buf(),
            source,
        };
        let manifest: Manifest = serde_json::from_str(&text).map_err(manifest_error)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(manifest_error(serde::de::Error::custom(format_args!(
                "unsupported manifest version {}; expected {MANIFEST_VERSION}",
                manifest.version
            ))));
        }
        tracing::debug!(%path, markers = manifest.markers.len(), "loaded marker manifest");
        let mut set: Self = manifest.markers.into_iter().collect();
        set.aliases = manifest.aliases;
        Ok(set)
    }

    /// Writes the set as a manifest.
    ///
    /// # Errors
    ///
    /// Returns [`GuardError::Manifest`] when encoding fails and
    /// [`GuardError::Io`] when the file cannot be written.
    pub fn save(&self, path: &Utf8Path) -> Result<(), GuardError> {
        let manifest = Manifest {
            version: MANIFEST_VERSION,
            markers: self.markers.values().cloned().collect(),
            aliases: self.enforced_aliases(),
        };
        let text =
            serde_json::to_string_pretty(&manifest).map_err(|source| GuardError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;
        write_utf8(path, &text)?;
        Ok(())
    }
}

impl FromIterator<GuardMarker> for MarkerSet {
    fn from_iter<I: IntoIterator<Item = GuardMarker>>(iter: I) -> Self {
        let mut set = Self::new();
        for marker in iter {
            set.insert(marker);
        }
        set
    }
}

fn unraw(ident: &Ident) -> String {
    syn::ext::IdentExt::unraw(ident).to_string()
}

/// Simple name of the type a path refers to.
pub(crate) fn type_name(path: &Path) -> Option<String> {
    path.segments.last().map(|segment| unraw(&segment.ident))
}

struct Collector<'a> {
    markers: &'a mut MarkerSet,
}

fn derives_record(attrs: &[Attribute]) -> bool {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("derive"))
        .filter_map(|attr| {
            attr.parse_args_with(Punctuated::<Path, Token![,]>::parse_terminated)
                .ok()
        })
        .any(|paths| {
            paths
                .iter()
                .any(|path| type_name(path).as_deref() == Some("Record"))
        })
}

/// Reads the ban and factory settings from `#[record(...)]` attributes.
///
/// Unparseable attributes are left for the derive to report.
fn record_policy(attrs: &[Attribute]) -> (bool, Option<String>) {
    let mut forbid = false;
    let mut factory = Some(DEFAULT_FACTORY_NAME.to_owned());
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("record")) {
        let parsed = attr.parse_nested_meta(|meta| {
            let value = if meta.input.peek(Token![=]) {
                Some(meta.value()?.parse::<Lit>()?)
            } else {
                None
            };
            let enabled = !matches!(&value, Some(Lit::Bool(flag)) if !flag.value);
            if meta.path.is_ident("forbid_direct_construction") {
                forbid = enabled;
            } else if meta.path.is_ident("no_factory") {
                if enabled {
                    factory = None;
                }
            } else if meta.path.is_ident("factory") {
                factory = match value {
                    Some(Lit::Str(name)) => Some(name.value()),
                    _ if enabled => Some(DEFAULT_FACTORY_NAME.to_owned()),
                    _ => None,
                };
            }
            Ok(())
        });
        if let Err(err) = parsed {
            tracing::trace!(%err, "skipping unparseable record attribute");
        }
    }
    (forbid, factory)
}

/// Records every `as` rename in a `use` tree.
fn collect_renames(tree: &UseTree, markers: &mut MarkerSet) {
    match tree {
        UseTree::Path(path) => collect_renames(&path.tree, markers),
        UseTree::Group(group) => {
            for item in &group.items {
                collect_renames(item, markers);
            }
        }
        UseTree::Rename(rename) => {
            markers.insert_alias(unraw(&rename.rename), unraw(&rename.ident));
        }
        UseTree::Name(_) | UseTree::Glob(_) => {}
    }
}

impl<'ast> Visit<'ast> for Collector<'_> {
    fn visit_item_struct(&mut self, item: &'ast syn::ItemStruct) {
        if derives_record(&item.attrs) {
            let (forbid, factory) = record_policy(&item.attrs);
            let declared = GuardMarker::declared(unraw(&item.ident), forbid, factory.as_deref());
            if let Some(marker) = declared {
                tracing::debug!(record = %marker.type_id, "collected derive marker");
                self.markers.insert(marker);
            }
        }
        visit::visit_item_struct(self, item);
    }

    fn visit_item_impl(&mut self, item: &'ast syn::ItemImpl) {
        let is_marker_impl = item
            .trait_
            .as_ref()
            .is_some_and(|(_, path, _)| {
                type_name(path).as_deref() == Some("DirectConstructionForbidden")
            });
        if is_marker_impl {
            if let syn::Type::Path(self_ty) = item.self_ty.as_ref() {
                if let Some(name) = type_name(&self_ty.path) {
                    tracing::debug!(record = %name, "collected impl marker");
                    self.markers.insert(GuardMarker::active(name));
                }
            }
        }
        visit::visit_item_impl(self, item);
    }

    fn visit_item_use(&mut self, item: &'ast syn::ItemUse) {
        collect_renames(&item.tree, self.markers);
    }

    fn visit_item_type(&mut self, item: &'ast syn::ItemType) {
        if let syn::Type::Path(target) = item.ty.as_ref() {
            let aliased = target.qself.is_none().then(|| type_name(&target.path)).flatten();
            if let Some(name) = aliased {
                self.markers.insert_alias(unraw(&item.ident), name);
            }
        }
        visit::visit_item_type(self, item);
    }
}
