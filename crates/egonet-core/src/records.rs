use crate::model::{PersonDetail, PersonSummary, RecordSet, Surroundings};
use crate::{Error, Result};
use rustc_hash::FxHashSet;

/// Order-preserving list builder that drops repeated ids.
#[derive(Default)]
struct UniqueList {
    seen: FxHashSet<String>,
    items: Vec<PersonSummary>,
}

impl UniqueList {
    fn push(&mut self, records: &RecordSet, id: &str) {
        let Some(person) = records.individual(id) else {
            tracing::debug!(person = id, "skipping reference to unknown individual");
            return;
        };
        if self.seen.insert(person.id.clone()) {
            self.items.push(person.summary());
        }
    }
}

pub fn person_detail(person_id: &str, records: &RecordSet) -> Result<PersonDetail> {
    records
        .individual(person_id)
        .map(|p| p.detail())
        .ok_or_else(|| Error::PersonNotFound {
            id: person_id.to_string(),
        })
}

/// Resolves parents, siblings, spouses and children of `person_id`.
///
/// Families are visited in the order the person references them; within a family, husband comes
/// before wife and children keep their `CHIL` order. Unknown references are skipped.
pub fn resolve_surroundings(person_id: &str, records: &RecordSet) -> Result<Surroundings> {
    let Some(person) = records.individual(person_id) else {
        return Err(Error::PersonNotFound {
            id: person_id.to_string(),
        });
    };

    let mut parents = UniqueList::default();
    let mut siblings = UniqueList::default();
    let mut spouses = UniqueList::default();
    let mut children = UniqueList::default();

    for family_id in &person.parent_families {
        let Some(family) = records.family(family_id) else {
            tracing::debug!(family = %family_id, "skipping reference to unknown family");
            continue;
        };
        for parent_id in family.partners() {
            parents.push(records, parent_id);
        }
        for child_id in &family.children {
            if child_id != person_id {
                siblings.push(records, child_id);
            }
        }
    }

    for family_id in &person.spouse_families {
        let Some(family) = records.family(family_id) else {
            tracing::debug!(family = %family_id, "skipping reference to unknown family");
            continue;
        };
        if let Some(partner_id) = family.partner_of(person_id) {
            spouses.push(records, partner_id);
        }
        for child_id in &family.children {
            children.push(records, child_id);
        }
    }

    Ok(Surroundings {
        parents: parents.items,
        siblings: siblings.items,
        spouses: spouses.items,
        children: children.items,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Family, Individual};

    fn records() -> RecordSet {
        let mut r = RecordSet::default();
        for (id, name) in [("X", "Ego"), ("P1", "Alice"), ("P2", "Bob"), ("S1", "Sib")] {
            r.individuals
                .insert(id.to_string(), Individual::new(id, name));
        }
        r.individuals["X"].parent_families = vec!["F1".to_string(), "F1".to_string()];
        let mut f = Family::new("F1");
        f.husband = Some("P2".to_string());
        f.wife = Some("P1".to_string());
        f.children = vec!["S1".to_string(), "X".to_string(), "GHOST".to_string()];
        r.families.insert("F1".to_string(), f);
        r
    }

    #[test]
    fn duplicate_family_references_do_not_duplicate_relatives() {
        let s = resolve_surroundings("X", &records()).unwrap();
        let ids = |v: &[PersonSummary]| v.iter().map(|p| p.id.clone()).collect::<Vec<_>>();
        assert_eq!(ids(&s.parents), vec!["P2", "P1"]);
        assert_eq!(ids(&s.siblings), vec!["S1"]);
        assert!(s.spouses.is_empty());
        assert!(s.children.is_empty());
    }

    #[test]
    fn unknown_person_is_not_found() {
        let err = resolve_surroundings("nobody", &records()).unwrap_err();
        assert_eq!(err.to_string(), "Person not found");
        assert!(person_detail("nobody", &records()).is_err());
    }
}
