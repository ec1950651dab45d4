use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::table::{Column, TableRow};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SacramentType {
    Baptism,
    FirstCommunion,
    Confirmation,
    Marriage,
    Death,
}

impl SacramentType {
    pub const ALL: [SacramentType; 5] = [
        SacramentType::Baptism,
        SacramentType::FirstCommunion,
        SacramentType::Confirmation,
        SacramentType::Marriage,
        SacramentType::Death,
    ];

    /// Badge color for the type column.
    pub fn accent(&self) -> &'static str {
        match self {
            SacramentType::Baptism => "#1d4ed8",
            SacramentType::FirstCommunion => "#15803d",
            SacramentType::Confirmation => "#7e22ce",
            SacramentType::Marriage => "#b91c1c",
            SacramentType::Death => "#374151",
        }
    }
}

impl fmt::Display for SacramentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SacramentType::Baptism => "Baptism",
            SacramentType::FirstCommunion => "First Communion",
            SacramentType::Confirmation => "Confirmation",
            SacramentType::Marriage => "Marriage",
            SacramentType::Death => "Death",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PersonRef {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sacrament {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: SacramentType,
    #[serde(default)]
    pub parishioner: Option<PersonRef>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub priest: Option<PersonRef>,
}

/// Flattened record for the sacrament table.
#[derive(Debug, Clone, PartialEq)]
pub struct SacramentRow {
    pub id: i64,
    pub kind: SacramentType,
    pub parishioner_name: String,
    pub priest_name: String,
    pub date: Option<DateTime<Utc>>,
}

fn name_or_na(person: Option<&PersonRef>) -> String {
    person
        .and_then(|p| p.name.as_deref())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or("N/A")
        .to_string()
}

impl From<&Sacrament> for SacramentRow {
    fn from(s: &Sacrament) -> Self {
        Self {
            id: s.id,
            kind: s.kind,
            parishioner_name: name_or_na(s.parishioner.as_ref()),
            priest_name: name_or_na(s.priest.as_ref()),
            date: s.date,
        }
    }
}

pub fn sacrament_columns() -> Vec<Column> {
    vec![
        Column::new("parishionerName", "Parishioner Name"),
        Column::new("priestName", "Priest Name"),
        Column::new("type", "Sacrament Type"),
        Column::new("date", "Date"),
    ]
}

impl TableRow for SacramentRow {
    fn row_key(&self) -> String {
        self.id.to_string()
    }

    fn cell_value(&self, key: &str) -> Option<String> {
        match key {
            "parishionerName" => Some(self.parishioner_name.clone()),
            "priestName" => Some(self.priest_name.clone()),
            "type" => Some(self.kind.to_string()),
            "date" => self.date.map(|d| d.to_rfc3339()),
            _ => None,
        }
    }

    fn render_cell(&self, key: &str) -> String {
        match key {
            "date" => self
                .date
                .map(|d| d.with_timezone(&Local).format("%d %b %Y").to_string())
                .unwrap_or_else(|| "N/A".to_string()),
            _ => self.cell_value(key).unwrap_or_default(),
        }
    }
}

pub fn count_by_type(rows: &[SacramentRow]) -> HashMap<SacramentType, usize> {
    let mut counts: HashMap<SacramentType, usize> =
        SacramentType::ALL.iter().map(|t| (*t, 0)).collect();
    for row in rows {
        *counts.entry(row.kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flatten_with_fallbacks() {
        let json = r#"[
            {"id": 1, "type": "BAPTISM", "parishioner": {"name": "Anna"}, "priest": null},
            {"id": 2, "type": "DEATH", "date": "2029-11-02T00:00:00Z"}
        ]"#;
        let records: Vec<Sacrament> = serde_json::from_str(json).unwrap();
        let rows: Vec<SacramentRow> = records.iter().map(SacramentRow::from).collect();

        assert_eq!(rows[0].parishioner_name, "Anna");
        assert_eq!(rows[0].priest_name, "N/A");
        assert_eq!(rows[1].parishioner_name, "N/A");
        assert_eq!(rows[1].render_cell("type"), "Death");
        assert_eq!(rows[0].render_cell("date"), "N/A");
    }

    #[test]
    fn test_count_by_type_includes_zeroes() {
        let rows = vec![SacramentRow {
            id: 1,
            kind: SacramentType::Marriage,
            parishioner_name: "A".into(),
            priest_name: "B".into(),
            date: None,
        }];
        let counts = count_by_type(&rows);
        assert_eq!(counts[&SacramentType::Marriage], 1);
        assert_eq!(counts[&SacramentType::Baptism], 0);
        assert_eq!(counts.len(), 5);
    }
}
