//! Problem statement catalog
//!
//! The catalog is static and compiled into the binary.

use once_cell::sync::Lazy;
use serde::Serialize;

/// A problem statement teams can pick when registering
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProblemStatement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub track: &'static str,
}

static CATALOG: Lazy<Vec<ProblemStatement>> = Lazy::new(|| {
    vec![
        ProblemStatement {
            id: "PS-01",
            title: "Smart Campus Navigation",
            description: "Indoor wayfinding for students and visitors using existing campus infrastructure.",
            track: "Smart Cities",
        },
        ProblemStatement {
            id: "PS-02",
            title: "Crop Disease Early Warning",
            description: "Detect crop diseases from field photos and alert farmers before outbreaks spread.",
            track: "Agritech",
        },
        ProblemStatement {
            id: "PS-03",
            title: "Accessible Public Transit",
            description: "Real-time transit information tailored for visually and hearing impaired commuters.",
            track: "Accessibility",
        },
        ProblemStatement {
            id: "PS-04",
            title: "Medical Supply Chain Tracking",
            description: "Trace essential medicines from manufacturer to pharmacy to prevent counterfeits.",
            track: "Healthcare",
        },
        ProblemStatement {
            id: "PS-05",
            title: "Household Energy Insights",
            description: "Help households understand and reduce electricity usage from smart meter data.",
            track: "Sustainability",
        },
        ProblemStatement {
            id: "PS-06",
            title: "Open Innovation",
            description: "Any idea that does not fit the other tracks.",
            track: "Open",
        },
    ]
});

/// List every problem statement in catalog order
pub fn list_problem_statements() -> &'static [ProblemStatement] {
    &CATALOG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_ids_are_unique() {
        let statements = list_problem_statements();

        for (index, statement) in statements.iter().enumerate() {
            assert!(
                statements[..index].iter().all(|s| s.id != statement.id),
                "duplicate id {}",
                statement.id
            );
        }
    }
}
