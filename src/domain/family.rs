use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{null_as_default, opt_string_or_number};

/// An unregistered family offered in family-mode registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Family {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub head_of_family: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default = "one_member", deserialize_with = "at_least_one")]
    pub member_count: u32,
}

fn one_member() -> u32 {
    1
}

fn at_least_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1).max(1))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BccGroupRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FamilyRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub head_of_family: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub bcc_group: Option<BccGroupRef>,
}

/// An unregistered individual offered in individual-mode registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Parishioner {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(default)]
    pub family: Option<FamilyRef>,
}

/// Roster row for parishioners already registered to an event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredParishioner {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub family_id: i64,
    #[serde(default)]
    pub family: Option<FamilyRef>,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub receipt_number: Option<String>,
}

/// Shared view of anything that can be listed under a family heading.
pub trait FamilyMember {
    fn id(&self) -> i64;
    fn name(&self) -> &str;
    fn family_id(&self) -> i64;
    fn family(&self) -> Option<&FamilyRef>;
}

impl FamilyMember for Parishioner {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn family_id(&self) -> i64 {
        self.family_id
    }
    fn family(&self) -> Option<&FamilyRef> {
        self.family.as_ref()
    }
}

impl FamilyMember for RegisteredParishioner {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn family_id(&self) -> i64 {
        self.family_id
    }
    fn family(&self) -> Option<&FamilyRef> {
        self.family.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FamilyGroup<T> {
    pub family_id: i64,
    pub head_of_family: String,
    pub phone_number: String,
    pub bcc_group: Option<String>,
    pub members: Vec<T>,
}

impl<T: FamilyMember> FamilyGroup<T> {
    fn matches_heading(&self, needle: &str) -> bool {
        self.head_of_family.to_lowercase().contains(needle)
            || self.phone_number.to_lowercase().contains(needle)
    }
}

/// Groups members by family id, keeping the order in which families first appear.
pub fn group_by_family<T: FamilyMember + Clone>(members: &[T]) -> Vec<FamilyGroup<T>> {
    let mut groups: Vec<FamilyGroup<T>> = Vec::new();

    for member in members {
        match groups.iter_mut().find(|g| g.family_id == member.family_id()) {
            Some(group) => group.members.push(member.clone()),
            None => {
                let family = member.family();
                let head = family
                    .map(|f| f.head_of_family.trim())
                    .filter(|h| !h.is_empty())
                    .unwrap_or("Unknown");
                let phone = family
                    .and_then(|f| f.phone_number.as_deref())
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or("N/A");
                groups.push(FamilyGroup {
                    family_id: member.family_id(),
                    head_of_family: head.to_string(),
                    phone_number: phone.to_string(),
                    bcc_group: family
                        .and_then(|f| f.bcc_group.as_ref())
                        .and_then(|g| g.name.clone()),
                    members: vec![member.clone()],
                });
            }
        }
    }

    groups
}

/// Narrows groups by a search term. A group whose head or phone matches keeps
/// every member; otherwise only members whose name matches survive.
pub fn filter_groups<T: FamilyMember + Clone>(
    groups: &[FamilyGroup<T>],
    search: &str,
) -> Vec<FamilyGroup<T>> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return groups.to_vec();
    }

    groups
        .iter()
        .filter_map(|group| {
            if group.matches_heading(&needle) {
                return Some(group.clone());
            }
            let members: Vec<T> = group
                .members
                .iter()
                .filter(|m| m.name().to_lowercase().contains(&needle))
                .cloned()
                .collect();
            (!members.is_empty()).then(|| FamilyGroup {
                members,
                ..group.clone()
            })
        })
        .collect()
}

pub fn filter_families(families: &[Family], search: &str) -> Vec<Family> {
    let needle = search.trim().to_lowercase();
    if needle.is_empty() {
        return families.to_vec();
    }
    families
        .iter()
        .filter(|f| {
            f.head_of_family.to_lowercase().contains(&needle)
                || f.phone_number
                    .as_deref()
                    .is_some_and(|p| p.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

pub fn display_gender(gender: Option<&str>) -> &'static str {
    match gender.map(|g| g.trim().to_ascii_uppercase()) {
        Some(g) if g == "MALE" || g == "M" => "Male",
        Some(g) if g == "FEMALE" || g == "F" => "Female",
        _ => "Not specified",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, name: &str, family_id: i64, head: &str, phone: Option<&str>) -> Parishioner {
        Parishioner {
            id,
            name: name.to_string(),
            gender: None,
            family_id,
            family: Some(FamilyRef {
                head_of_family: head.to_string(),
                phone_number: phone.map(str::to_string),
                bcc_group: None,
            }),
        }
    }

    fn sample() -> Vec<Parishioner> {
        vec![
            member(1, "Anna Joseph", 20, "Joseph Mathew", Some("9847012345")),
            member(2, "Thomas Varghese", 10, "Varghese Thomas", None),
            member(3, "Mary Joseph", 20, "Joseph Mathew", Some("9847012345")),
        ]
    }

    #[test]
    fn test_groups_keep_first_seen_order() {
        let groups = group_by_family(&sample());
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].family_id, 20);
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[1].phone_number, "N/A");
    }

    #[test]
    fn test_missing_family_falls_back_to_unknown() {
        let mut p = member(4, "Lone", 30, "", None);
        p.family = None;
        let groups = group_by_family(&[p]);
        assert_eq!(groups[0].head_of_family, "Unknown");
        assert_eq!(groups[0].phone_number, "N/A");
    }

    #[test]
    fn test_search_on_head_keeps_whole_family() {
        let groups = group_by_family(&sample());
        let hits = filter_groups(&groups, "mathew");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].members.len(), 2);
    }

    #[test]
    fn test_search_on_member_keeps_only_matches() {
        let groups = group_by_family(&sample());
        let hits = filter_groups(&groups, "ANNA");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].members.len(), 1);
        assert_eq!(hits[0].members[0].id, 1);
    }

    #[test]
    fn test_search_by_phone() {
        let families = vec![
            Family {
                id: 1,
                head_of_family: "A".into(),
                phone_number: Some("12345".into()),
                member_count: 3,
            },
            Family {
                id: 2,
                head_of_family: "B".into(),
                phone_number: None,
                member_count: 2,
            },
        ];
        assert_eq!(filter_families(&families, "234").len(), 1);
        assert_eq!(filter_families(&families, "  ").len(), 2);
    }

    #[test]
    fn test_member_count_never_zero() {
        let f: Family =
            serde_json::from_str(r#"{"id": 1, "headOfFamily": "X", "memberCount": 0}"#).unwrap();
        assert_eq!(f.member_count, 1);
        let f: Family = serde_json::from_str(r#"{"id": 1, "headOfFamily": "X"}"#).unwrap();
        assert_eq!(f.member_count, 1);
    }

    #[test]
    fn test_display_gender() {
        assert_eq!(display_gender(Some("male")), "Male");
        assert_eq!(display_gender(Some("F")), "Female");
        assert_eq!(display_gender(None), "Not specified");
    }
}
