//! Base/wip branch naming.
//!
//! A session has no stored state: the base and wip branch are re-derived
//! from the current branch name on every command, so a rename or deletion
//! made by a teammate between two invocations is always picked up.

use std::fmt;

/// Legacy wip branch shared by everyone working on `master`.
pub const LEGACY_WIP_BRANCH: &str = "mob-session";
const LEGACY_BASE_BRANCH: &str = "master";

/// How wip branch names are built from base branch names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Naming {
    pub prefix: String,
    /// Sub-team suffix; `None` when unqualified.
    pub qualifier: Option<String>,
    pub separator: String,
}

impl Naming {
    /// The `<separator><qualifier>` suffix, if a qualifier is configured.
    fn qualifier_suffix(&self) -> Option<String> {
        self.qualifier
            .as_ref()
            .map(|q| format!("{}{q}", self.separator))
    }
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            prefix: "mob/".into(),
            qualifier: None,
            separator: "-".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Branch {
    pub name: String,
}

impl Branch {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
        }
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    /// The remote-tracking name, e.g. `origin/main`.
    pub fn remote(&self, remote_name: &str) -> String {
        format!("{remote_name}/{}", self.name)
    }

    pub fn exists_in(&self, branches: &[String]) -> bool {
        branches.iter().any(|b| *b == self.name)
    }

    pub fn is_wip(&self, naming: &Naming) -> bool {
        self.is(LEGACY_WIP_BRANCH) || self.name.starts_with(&naming.prefix)
    }

    fn with_wip_prefix(&self, naming: &Naming) -> Branch {
        Branch::new(&format!("{}{}", naming.prefix, self.name))
    }

    fn with_wip_qualifier(&self, naming: &Naming) -> Branch {
        match naming.qualifier_suffix() {
            Some(suffix) => Branch::new(&format!("{}{suffix}", self.name)),
            None => self.clone(),
        }
    }

    fn without_wip_prefix(&self, naming: &Naming) -> Branch {
        match self.name.strip_prefix(&naming.prefix) {
            Some(rest) => Branch::new(rest),
            None => self.clone(),
        }
    }

    /// Strip qualifiers until the name matches an existing local branch or
    /// nothing more can be stripped.
    fn without_wip_qualifier(&self, local_branches: &[String], naming: &Naming) -> Branch {
        let mut branch = self.clone();
        while !branch.exists_in(local_branches)
            && (naming.qualifier.is_some()
                || (!naming.separator.is_empty() && branch.name.contains(&naming.separator)))
        {
            let stripped = branch.strip_one_qualifier(naming);
            if stripped == branch {
                break;
            }
            branch = stripped;
        }
        branch
    }

    fn strip_one_qualifier(&self, naming: &Naming) -> Branch {
        match naming.qualifier_suffix() {
            Some(suffix) => match self.name.strip_suffix(&suffix) {
                Some(rest) => Branch::new(rest),
                None => self.clone(),
            },
            None => match self.name.rfind(&naming.separator) {
                Some(idx) => Branch::new(&self.name[..idx]),
                None => self.clone(),
            },
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The base branch a session builds on and the wip branch it shares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPair {
    pub base: Branch,
    pub wip: Branch,
}

impl BranchPair {
    /// Derive the pair from the branch currently checked out.
    ///
    /// The current branch is always exactly one of the two results; anything
    /// else is a bug in the naming rules and aborts.
    pub fn resolve(current: &Branch, local_branches: &[String], naming: &Naming) -> BranchPair {
        let pair = if current.is(LEGACY_WIP_BRANCH)
            || (current.is(LEGACY_BASE_BRANCH) && naming.qualifier.is_none())
        {
            BranchPair {
                base: Branch::new(LEGACY_BASE_BRANCH),
                wip: Branch::new(LEGACY_WIP_BRANCH),
            }
        } else if current.is_wip(naming) {
            BranchPair {
                base: current
                    .without_wip_prefix(naming)
                    .without_wip_qualifier(local_branches, naming),
                wip: current.clone(),
            }
        } else {
            BranchPair {
                base: current.clone(),
                wip: current.with_wip_prefix(naming).with_wip_qualifier(naming),
            }
        };

        tracing::debug!(
            current = %current,
            base = %pair.base,
            wip = %pair.wip,
            local = %local_branches.join(","),
            "resolved branch pair"
        );
        assert!(
            (*current == pair.base) != (*current == pair.wip),
            "branch pair {} / {} does not contain current branch {current}",
            pair.base,
            pair.wip
        );
        pair
    }

    /// Whether the current branch is this pair's wip branch.
    pub fn is_wip_current(&self, current: &Branch) -> bool {
        *current == self.wip
    }
}
