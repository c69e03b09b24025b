//! Outcome of a pipeline run

use std::fmt;

use crate::geometry::GeometryError;

/// Why a source object produced no collider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The source is hidden
    Hidden,
    /// The source name matched one of the grouping's skip substrings
    NameFiltered,
    /// No mesh payload, or an externally linked object
    Ineligible,
}

/// A per-object failure that did not stop the run
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFailure {
    /// Object name at the time of the failure
    pub object: String,
    /// What went wrong
    pub error: GeometryError,
}

/// Collider generation results for one source grouping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupReport {
    /// Source grouping name
    pub name: String,
    /// Names of the colliders created, in creation order
    pub created: Vec<String>,
    /// Skipped sources and why
    pub skipped: Vec<(String, SkipReason)>,
    /// Sources whose builder failed
    pub failures: Vec<ObjectFailure>,
}

impl GroupReport {
    /// Empty report for a grouping
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of sources skipped for `reason`
    pub fn skipped_for(&self, reason: SkipReason) -> usize {
        self.skipped.iter().filter(|(_, r)| *r == reason).count()
    }
}

/// Summary of everything a run changed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineReport {
    /// Materials whose back-face culling was switched on
    pub materials_updated: usize,
    /// Placeholders removed by clearing the links grouping
    pub links_removed: usize,
    /// Names of the placeholders created
    pub placeholders: Vec<String>,
    /// Colliders removed by clearing the output grouping
    pub colliders_removed: usize,
    /// Per source grouping results, in processing order
    pub groups: Vec<GroupReport>,
    /// Colliders whose rotation and scale were baked
    pub normalized: usize,
    /// Colliders whose transform could not be baked
    pub normalize_failures: Vec<ObjectFailure>,
}

impl PipelineReport {
    /// Total colliders created across all groupings
    pub fn colliders_created(&self) -> usize {
        self.groups.iter().map(|g| g.created.len()).sum()
    }

    /// Results for a source grouping
    pub fn group(&self, name: &str) -> Option<&GroupReport> {
        self.groups.iter().find(|g| g.name == name)
    }

    /// Every per-object failure, generation first
    pub fn failures(&self) -> impl Iterator<Item = &ObjectFailure> {
        self.groups
            .iter()
            .flat_map(|g| g.failures.iter())
            .chain(self.normalize_failures.iter())
    }

    /// Whether the run finished without any per-object failure
    pub fn is_clean(&self) -> bool {
        self.failures().next().is_none()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} colliders created ({} removed), {} placeholders, {} normalized, {} failures",
            self.colliders_created(),
            self.colliders_removed,
            self.placeholders.len(),
            self.normalized,
            self.failures().count(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_totals() {
        let mut flora = GroupReport::new("FloraAndRocks");
        flora.created.push("rock_07_collider".to_string());
        flora.skipped.push(("grassTuft_07".to_string(), SkipReason::NameFiltered));
        flora.skipped.push(("bush_hidden".to_string(), SkipReason::Hidden));

        let mut terrain = GroupReport::new("TerrainPieces");
        terrain.created.push("Hill_01_collider".to_string());
        terrain.failures.push(ObjectFailure {
            object: "Cliff".to_string(),
            error: GeometryError::MissingMesh("Cliff".to_string()),
        });

        let report = PipelineReport {
            groups: vec![flora, terrain],
            normalized: 2,
            ..Default::default()
        };

        assert_eq!(report.colliders_created(), 2);
        assert_eq!(report.group("FloraAndRocks").unwrap().skipped_for(SkipReason::NameFiltered), 1);
        assert!(report.group("Decorations").is_none());
        assert!(!report.is_clean());
        assert_eq!(
            report.to_string(),
            "2 colliders created (0 removed), 0 placeholders, 2 normalized, 1 failures"
        );
    }
}
