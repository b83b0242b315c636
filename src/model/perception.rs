//! Perception of the tactical planner.

use serde::{Deserialize, Serialize};

use crate::values::{Anticipation, ClassNameType, Estimation, ExprValue, TaskManager};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionType {
    pub categories: PerceptionCategories,
    pub headway_gtu_type: Option<HeadwayGtuType>,
    pub mental: Option<Mental>,
}

/// Which perception categories are active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerceptionCategories {
    pub ego: bool,
    pub infrastructure: bool,
    pub neighbors: bool,
    pub intersection: bool,
    pub bus_stop: bool,
    pub traffic: bool,
}

impl PerceptionCategories {
    pub const ELEMENTS: [&'static str; 6] = [
        "Ego",
        "Infrastructure",
        "Neighbors",
        "Intersection",
        "BusStop",
        "Traffic",
    ];

    pub fn flags(&self) -> [bool; 6] {
        [
            self.ego,
            self.infrastructure,
            self.neighbors,
            self.intersection,
            self.bus_stop,
            self.traffic,
        ]
    }

    /// Enable the category with the given element name.
    pub fn enable(&mut self, element: &str) -> bool {
        let flag = match element {
            "Ego" => &mut self.ego,
            "Infrastructure" => &mut self.infrastructure,
            "Neighbors" => &mut self.neighbors,
            "Intersection" => &mut self.intersection,
            "BusStop" => &mut self.bus_stop,
            "Traffic" => &mut self.traffic,
            _ => return false,
        };
        *flag = true;
        true
    }
}

/// How perceived leaders and followers are represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HeadwayGtuType {
    /// Wrap the real GTU.
    Wrap,
    Perceived {
        estimation: ExprValue<Estimation>,
        anticipation: ExprValue<Anticipation>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Mental {
    Fuller(Fuller),
}

/// Fuller's task-capability interface model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Fuller {
    pub tasks: Vec<ClassNameType>,
    pub behavioral_adaptations: BehavioralAdaptations,
    pub task_manager: Option<ExprValue<TaskManager>>,
}

impl Fuller {
    pub fn effective_task_manager(&self) -> ExprValue<TaskManager> {
        self.task_manager
            .clone()
            .unwrap_or(ExprValue::Value(TaskManager::Summative))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralAdaptations {
    pub situational_awareness: bool,
    pub headway: bool,
    pub speed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_categories() {
        let mut categories = PerceptionCategories::default();
        assert!(categories.enable("Neighbors"));
        assert!(categories.enable("BusStop"));
        assert!(!categories.enable("Weather"));
        assert_eq!(categories.flags(), [false, false, true, false, true, false]);
    }
}
