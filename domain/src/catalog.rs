use serde::Serialize;
use utoipa::ToSchema;

use crate::landing::Icon;

/// A select option: stored value plus what the user sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct MenuItem {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: Icon,
}

const fn choice(value: &'static str, label: &'static str) -> Choice {
    Choice { value, label }
}

pub const CATEGORIES: [Choice; 11] = [
    choice("Engineering", "Engineering"),
    choice("Design", "Design"),
    choice("Marketing", "Marketing"),
    choice("Sales", "Sales"),
    choice("IT & Software", "IT & Software"),
    choice("Customer-service", "Customer Service"),
    choice("Product", "Product"),
    choice("Operations", "Operations"),
    choice("Finance", "Finance"),
    choice("HR", "Human Resources"),
    choice("Other", "Other"),
];

pub const JOB_TYPES: [Choice; 5] = [
    choice("Remote", "Remote"),
    choice("Full-Time", "Full-Time"),
    choice("Part-Time", "Part-Time"),
    choice("Contract", "Contract"),
    choice("Internship", "Internship"),
];

pub const SALARY_RANGES: [&str; 3] = [
    "Less than $1000",
    "$1000 – $15,000",
    "More than $15,000",
];

/// Employer area navigation
pub const NAVIGATION_MENU: [MenuItem; 4] = [
    MenuItem {
        id: "employer-dashboard",
        name: "Dashboard",
        icon: Icon::LayoutDashboard,
    },
    MenuItem {
        id: "post-job",
        name: "Post Job",
        icon: Icon::Plus,
    },
    MenuItem {
        id: "manage-jobs",
        name: "Manage Jobs",
        icon: Icon::Briefcase,
    },
    MenuItem {
        id: "company-profile",
        name: "Company Profile",
        icon: Icon::Building,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Catalog {
    pub categories: Vec<Choice>,
    pub job_types: Vec<Choice>,
    pub salary_ranges: Vec<&'static str>,
    pub navigation_menu: Vec<MenuItem>,
}

pub fn catalog() -> Catalog {
    Catalog {
        categories: CATEGORIES.to_vec(),
        job_types: JOB_TYPES.to_vec(),
        salary_ranges: SALARY_RANGES.to_vec(),
        navigation_menu: NAVIGATION_MENU.to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_may_differ_from_values() {
        let hr = CATEGORIES.iter().find(|c| c.value == "HR").unwrap();
        assert_eq!(hr.label, "Human Resources");
    }

    #[test]
    fn menu_starts_at_the_dashboard() {
        let json = serde_json::to_value(catalog()).unwrap();
        assert_eq!(json["navigation_menu"][0]["id"], "employer-dashboard");
        assert_eq!(json["navigation_menu"][0]["icon"], "layout-dashboard");
        assert_eq!(json["salary_ranges"].as_array().unwrap().len(), 3);
    }
}
