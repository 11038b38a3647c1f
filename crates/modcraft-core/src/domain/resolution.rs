//! Module resolution planner.
//!
//! Turns a requested selection of module names into a validated application
//! order:
//!
//! 1. **Expand**: depth-first over `requires` edges, collecting the
//!    transitive closure. Unknown names fail with `ModuleNotFound`.
//! 2. **Conflict check**: every module in the closure, requested or pulled
//!    in, is checked against every other member.
//! 3. **Order**: three-colour DFS from lexicographically sorted roots,
//!    emitting post-order so each module follows all of its requirements.
//!
//! The planner is pure: it only reads descriptors through
//! [`DescriptorLookup`], so a failed plan can never have side effects.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{DomainError, ModuleDescriptor, ModuleName};

/// Read access to module descriptors by name.
pub trait DescriptorLookup {
    fn descriptor(&self, name: &str) -> Option<&ModuleDescriptor>;
}

impl DescriptorLookup for [ModuleDescriptor] {
    fn descriptor(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.iter().find(|d| d.name() == name)
    }
}

impl DescriptorLookup for Vec<ModuleDescriptor> {
    fn descriptor(&self, name: &str) -> Option<&ModuleDescriptor> {
        self.as_slice().descriptor(name)
    }
}

/// Output of a successful resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolutionPlan {
    /// Application order; requirements first.
    pub order: Vec<ModuleName>,
    /// Transitive closure of the request, sorted.
    pub expanded: BTreeSet<ModuleName>,
}

impl ResolutionPlan {
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Position of `name` in the application order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|n| n == name)
    }
}

/// Resolve `requested` into an application plan.
pub fn resolve<L, I, S>(lookup: &L, requested: I) -> Result<ResolutionPlan, DomainError>
where
    L: DescriptorLookup + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut expanded = BTreeSet::new();
    for name in requested {
        expand(lookup, name.as_ref(), None, &mut expanded)?;
    }

    check_conflicts(lookup, &expanded)?;

    let order = order(lookup, &expanded)?;
    Ok(ResolutionPlan { order, expanded })
}

fn expand<L: DescriptorLookup + ?Sized>(
    lookup: &L,
    name: &str,
    required_by: Option<&str>,
    visited: &mut BTreeSet<ModuleName>,
) -> Result<(), DomainError> {
    if visited.contains(name) {
        return Ok(());
    }
    let descriptor = lookup
        .descriptor(name)
        .ok_or_else(|| DomainError::ModuleNotFound {
            name: name.to_string(),
            required_by: required_by.map(str::to_string),
        })?;

    visited.insert(descriptor.name().clone());
    for requirement in descriptor.requires() {
        expand(lookup, requirement.as_str(), Some(name), visited)?;
    }
    Ok(())
}

fn check_conflicts<L: DescriptorLookup + ?Sized>(
    lookup: &L,
    expanded: &BTreeSet<ModuleName>,
) -> Result<(), DomainError> {
    for name in expanded {
        let Some(descriptor) = lookup.descriptor(name.as_str()) else {
            continue;
        };
        if let Some(other) = descriptor.conflicts().iter().find(|c| expanded.contains(*c)) {
            return Err(DomainError::ConflictDetected {
                module: name.to_string(),
                conflicts_with: other.to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    InProgress,
    Done,
}

struct Sorter<'a, L: ?Sized> {
    lookup: &'a L,
    marks: HashMap<ModuleName, Mark>,
    stack: Vec<ModuleName>,
    order: Vec<ModuleName>,
}

impl<L: DescriptorLookup + ?Sized> Sorter<'_, L> {
    fn visit(&mut self, name: &ModuleName) -> Result<(), DomainError> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(()),
            Some(Mark::InProgress) => {
                let start = self.stack.iter().position(|n| n == name).unwrap_or(0);
                let mut path: Vec<String> =
                    self.stack[start..].iter().map(ToString::to_string).collect();
                path.push(name.to_string());
                return Err(DomainError::CycleDetected {
                    module: name.to_string(),
                    path,
                });
            }
            None => {}
        }

        self.marks.insert(name.clone(), Mark::InProgress);
        self.stack.push(name.clone());

        let lookup = self.lookup;
        if let Some(descriptor) = lookup.descriptor(name.as_str()) {
            // Edges to registered modules outside the closure are followed
            // too; unregistered ones were already rejected during expansion.
            for requirement in descriptor.requires() {
                if lookup.descriptor(requirement.as_str()).is_some() {
                    self.visit(requirement)?;
                }
            }
        }

        self.stack.pop();
        self.marks.insert(name.clone(), Mark::Done);
        self.order.push(name.clone());
        Ok(())
    }
}

fn order<L: DescriptorLookup + ?Sized>(
    lookup: &L,
    expanded: &BTreeSet<ModuleName>,
) -> Result<Vec<ModuleName>, DomainError> {
    let mut sorter = Sorter {
        lookup,
        marks: HashMap::with_capacity(expanded.len()),
        stack: Vec::new(),
        order: Vec::with_capacity(expanded.len()),
    };
    // BTreeSet iteration is already lexicographic.
    for root in expanded {
        sorter.visit(root)?;
    }
    Ok(sorter.order)
}
