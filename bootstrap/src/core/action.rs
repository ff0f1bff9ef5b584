//! Identities of the provisioning steps.

use std::fmt;

/// One provisioning step. Variant order is declaration order, which is also
/// execution order regardless of how actions are named on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionId {
    GitInitSubmodules,
    GitSubmodulesMasterBranch,
    LinkSubmodules,
    InstallSubModuleRequirements,
    InstallSiteRequirements,
    GenSourceme,
    GenSettings,
}

impl ActionId {
    pub const ALL: [ActionId; 7] = [
        ActionId::GitInitSubmodules,
        ActionId::GitSubmodulesMasterBranch,
        ActionId::LinkSubmodules,
        ActionId::InstallSubModuleRequirements,
        ActionId::InstallSiteRequirements,
        ActionId::GenSourceme,
        ActionId::GenSettings,
    ];

    /// Stable name used on the command line and as the status file key.
    pub fn name(self) -> &'static str {
        match self {
            ActionId::GitInitSubmodules => "gitInitSubmodules",
            ActionId::GitSubmodulesMasterBranch => "gitSubmodulesMasterBranch",
            ActionId::LinkSubmodules => "linkSubmodules",
            ActionId::InstallSubModuleRequirements => "installSubModuleRequirements",
            ActionId::InstallSiteRequirements => "installSiteRequirements",
            ActionId::GenSourceme => "genSourceme",
            ActionId::GenSettings => "genSettings",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.name() == name)
    }

    /// Human-readable text shown at the confirmation prompt.
    pub fn description(self) -> &'static str {
        match self {
            ActionId::GitInitSubmodules => "Init and update submodules",
            ActionId::GitSubmodulesMasterBranch => {
                "Set submodules to be on their master branch for development"
            }
            ActionId::LinkSubmodules => "Link submodule apps into the apps directory",
            ActionId::InstallSubModuleRequirements => {
                "Install Python modules listed in the requirements for each submodule"
            }
            ActionId::InstallSiteRequirements => {
                "Install Python modules listed in the site-level requirements"
            }
            ActionId::GenSourceme => "Create initial sourceme.sh file",
            ActionId::GenSettings => "Create initial settings.py file",
        }
    }

    /// Whether the operator is asked before this action runs.
    pub fn requires_confirmation(self) -> bool {
        matches!(
            self,
            ActionId::GitInitSubmodules
                | ActionId::GitSubmodulesMasterBranch
                | ActionId::InstallSubModuleRequirements
                | ActionId::InstallSiteRequirements
        )
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for id in ActionId::ALL {
            assert_eq!(ActionId::from_name(id.name()), Some(id));
        }
        assert_eq!(ActionId::from_name("GitInitSubmodules"), None);
    }

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = ActionId::ALL;
        sorted.sort();
        assert_eq!(sorted, ActionId::ALL);
    }

    #[test]
    fn generators_run_without_confirmation() {
        assert!(!ActionId::GenSourceme.requires_confirmation());
        assert!(!ActionId::GenSettings.requires_confirmation());
        assert!(ActionId::GitInitSubmodules.requires_confirmation());
    }
}
