//! Symbolic service keys and the descriptor table behind them.

use std::{
    collections::{BTreeMap, HashSet},
    fmt,
    str::FromStr,
};

use shared::{domain::ServiceDescriptor, error::DescriptorError};
use tracing::debug;

use crate::error::UnknownService;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
    FindOwners0,
    FindOwners1,
    FindOwners2,
    FindOwners3,
    FindOwners4,
    GetOwner,
    SaveOwner,
    GetVets,
    SaveVisit,
    GetPet,
    SavePet,
    GetPetTypes,
    GetNominations,
    GetSponsorNominations,
    GetAllNominations,
    NewNomination,
    UpdateNomination,
    DeleteNomination,
    LookupEmployees,
}

impl Service {
    pub const ALL: [Service; 19] = [
        Service::FindOwners0,
        Service::FindOwners1,
        Service::FindOwners2,
        Service::FindOwners3,
        Service::FindOwners4,
        Service::GetOwner,
        Service::SaveOwner,
        Service::GetVets,
        Service::SaveVisit,
        Service::GetPet,
        Service::SavePet,
        Service::GetPetTypes,
        Service::GetNominations,
        Service::GetSponsorNominations,
        Service::GetAllNominations,
        Service::NewNomination,
        Service::UpdateNomination,
        Service::DeleteNomination,
        Service::LookupEmployees,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Service::FindOwners0 => "findOwners0",
            Service::FindOwners1 => "findOwners1",
            Service::FindOwners2 => "findOwners2",
            Service::FindOwners3 => "findOwners3",
            Service::FindOwners4 => "findOwners4",
            Service::GetOwner => "getOwner",
            Service::SaveOwner => "saveOwner",
            Service::GetVets => "getVets",
            Service::SaveVisit => "saveVisit",
            Service::GetPet => "getPet",
            Service::SavePet => "savePet",
            Service::GetPetTypes => "getPetTypes",
            Service::GetNominations => "getNominations",
            Service::GetSponsorNominations => "getSponsorNominations",
            Service::GetAllNominations => "getAllNominations",
            Service::NewNomination => "newNomination",
            Service::UpdateNomination => "updateNomination",
            Service::DeleteNomination => "deleteNomination",
            Service::LookupEmployees => "lookupEmployees",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn default_descriptor(self) -> ServiceDescriptor {
        match self {
            Service::FindOwners0 => ServiceDescriptor::get("pet.owner.filter", "owner/0"),
            Service::FindOwners1 => ServiceDescriptor::get("pet.filterOwners", "owner/1"),
            Service::FindOwners2 => ServiceDescriptor::get("pet.filterWithJavaAction", "owner/2"),
            Service::FindOwners3 => ServiceDescriptor::get("pet.filterWithJavaService", "owner/3"),
            Service::FindOwners4 => ServiceDescriptor::get("clientSpecificServiceName", "owner/4"),
            Service::GetOwner => {
                ServiceDescriptor::get("pet.owner.get", "owner/id/").with_path_param("ownerId")
            }
            Service::SaveOwner => ServiceDescriptor::post("pet.owner.save", "owner"),
            Service::GetVets => ServiceDescriptor::get("pet.vet.filter", "vet"),
            Service::SaveVisit => ServiceDescriptor::post("pet.visit.save", "visit"),
            Service::GetPet => {
                ServiceDescriptor::get("pet.petDetail.get", "pet/id/").with_path_param("petId")
            }
            Service::SavePet => ServiceDescriptor::post("pet.pet.save", "pet"),
            Service::GetPetTypes => ServiceDescriptor::get("pet.petType.list", "petType"),
            Service::GetNominations => {
                ServiceDescriptor::get("submission.getnominations", "nomination/mine")
            }
            Service::GetSponsorNominations => {
                ServiceDescriptor::get("submission.getnomsponsor", "nomination/sponsor")
            }
            Service::GetAllNominations => {
                ServiceDescriptor::get("submission.getallnominations", "nomination")
            }
            Service::NewNomination => {
                ServiceDescriptor::post("submission.newnomination", "nomination/new")
            }
            Service::UpdateNomination => {
                ServiceDescriptor::post("submission.updatenomination", "nomination/update")
            }
            Service::DeleteNomination => {
                ServiceDescriptor::post("submission.deletenomination", "nomination/delete")
            }
            Service::LookupEmployees => {
                ServiceDescriptor::get("lookup.ldaplookup", "lookup/employees")
            }
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Service {
    type Err = UnknownService;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Service::ALL
            .into_iter()
            .find(|service| service.key().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownService(wanted.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    entries: Vec<ServiceDescriptor>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl ServiceRegistry {
    /// The full table of pet clinic and nomination services.
    pub fn standard() -> Self {
        Self {
            entries: Service::ALL
                .into_iter()
                .map(Service::default_descriptor)
                .collect(),
        }
    }

    pub fn get(&self, service: Service) -> &ServiceDescriptor {
        &self.entries[service.index()]
    }

    pub fn with_path(mut self, service: Service, path: impl Into<String>) -> Self {
        self.entries[service.index()].path = path.into();
        self
    }

    /// Applies path overrides keyed by service key.
    pub fn apply_path_overrides(
        &mut self,
        overrides: &BTreeMap<String, String>,
    ) -> Result<(), UnknownService> {
        for (key, path) in overrides {
            let service: Service = key.parse()?;
            debug!(service = %service, path = %path, "overriding service path");
            self.entries[service.index()].path = path.clone();
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), DescriptorError> {
        let mut names = HashSet::new();
        for descriptor in &self.entries {
            descriptor.validate()?;
            if !names.insert(descriptor.name.as_str()) {
                return Err(DescriptorError::DuplicateName {
                    name: descriptor.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Service, &ServiceDescriptor)> {
        Service::ALL.into_iter().zip(self.entries.iter())
    }
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
