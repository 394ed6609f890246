use chrono::{Datelike, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::signup::Role;

/// Icon names, rendered by the front-end from its own icon set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    Award,
    BarChart,
    Briefcase,
    Building,
    Clock,
    FileText,
    LayoutDashboard,
    MessageSquare,
    Plus,
    Search,
    Shield,
    Target,
    TrendingUp,
    Users,
}

impl Icon {
    pub fn as_str(self) -> &'static str {
        match self {
            Icon::Award => "award",
            Icon::BarChart => "bar-chart",
            Icon::Briefcase => "briefcase",
            Icon::Building => "building",
            Icon::Clock => "clock",
            Icon::FileText => "file-text",
            Icon::LayoutDashboard => "layout-dashboard",
            Icon::MessageSquare => "message-square",
            Icon::Plus => "plus",
            Icon::Search => "search",
            Icon::Shield => "shield",
            Icon::Target => "target",
            Icon::TrendingUp => "trending-up",
            Icon::Users => "users",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatEntry {
    pub icon: Icon,
    pub label: &'static str,
    pub value: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsEntry {
    pub icon: Icon,
    pub value: &'static str,
    pub label: &'static str,
    pub growth: &'static str,
    pub icon_color: &'static str,
    pub background_color: &'static str,
    pub badge_color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeatureEntry {
    pub icon: Icon,
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct CallToAction {
    pub label: &'static str,
    pub route: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct HeroContent {
    pub headline: &'static str,
    pub headline_accent: &'static str,
    pub subheading: &'static str,
    pub find_jobs: CallToAction,
    pub post_job: CallToAction,
    pub stats: Vec<StatEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct AnalyticsContent {
    pub title: &'static str,
    pub title_accent: &'static str,
    pub subtitle: &'static str,
    pub entries: Vec<AnalyticsEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FeaturesContent {
    pub title: &'static str,
    pub title_accent: &'static str,
    pub subtitle: &'static str,
    pub job_seekers: Vec<FeatureEntry>,
    pub employers: Vec<FeatureEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FooterContent {
    pub brand: &'static str,
    pub taglines: Vec<&'static str>,
    pub copyright: String,
    pub credits: &'static str,
}

/// Everything the landing page shows, for one viewer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LandingPage {
    pub hero: HeroContent,
    pub analytics: AnalyticsContent,
    pub features: FeaturesContent,
    pub footer: FooterContent,
}

/// Who is looking at the page; the hero's "Post a Job" target depends on it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Viewer {
    #[default]
    Anonymous,
    Authenticated(Role),
}

pub const BRAND: &str = "JobPortal";
pub const FIND_JOBS_ROUTE: &str = "/find-jobs";
pub const EMPLOYER_DASHBOARD_ROUTE: &str = "/employer-dashboard";
pub const LOGIN_ROUTE: &str = "/login";

pub const HERO_STATS: [StatEntry; 3] = [
    StatEntry {
        icon: Icon::Users,
        label: "Active Users",
        value: "2.4M+",
    },
    StatEntry {
        icon: Icon::Building,
        label: "Companies",
        value: "50K+",
    },
    StatEntry {
        icon: Icon::TrendingUp,
        label: "Jobs Posted",
        value: "150K+",
    },
];

const GROWTH_BADGE: &str = "bg-green-100 text-green-800";

pub const ANALYTICS: [AnalyticsEntry; 4] = [
    AnalyticsEntry {
        icon: Icon::Users,
        value: "2.4M+",
        label: "Active Users",
        growth: "+15%",
        icon_color: "text-blue-600",
        background_color: "bg-blue-100",
        badge_color: GROWTH_BADGE,
    },
    AnalyticsEntry {
        icon: Icon::Briefcase,
        value: "150K+",
        label: "Jobs Posted",
        growth: "+22%",
        icon_color: "text-purple-600",
        background_color: "bg-purple-100",
        badge_color: GROWTH_BADGE,
    },
    AnalyticsEntry {
        icon: Icon::Target,
        value: "89K+",
        label: "Successful Hires",
        growth: "+18%",
        icon_color: "text-indigo-600",
        background_color: "bg-indigo-100",
        badge_color: GROWTH_BADGE,
    },
    AnalyticsEntry {
        icon: Icon::TrendingUp,
        value: "94%",
        label: "Match Rate",
        growth: "+8%",
        icon_color: "text-red-600",
        background_color: "bg-red-100",
        badge_color: GROWTH_BADGE,
    },
];

pub const JOB_SEEKER_FEATURES: [FeatureEntry; 4] = [
    FeatureEntry {
        icon: Icon::Search,
        title: "Smart Job Matching",
        description: "AI-powered algorithm matches you with relevant opportunities based on your skills and preferences.",
    },
    FeatureEntry {
        icon: Icon::FileText,
        title: "Resume Builder",
        description: "Create professional resumes with our intuitive builder and templates designed for job seekers.",
    },
    FeatureEntry {
        icon: Icon::MessageSquare,
        title: "Application Tracking",
        description: "Easily track all your applications and stay updated on your hiring progress in one place.",
    },
    FeatureEntry {
        icon: Icon::Award,
        title: "Skill Assessments",
        description: "Showcase your abilities with verified skill tests and stand out to employers.",
    },
];

pub const EMPLOYER_FEATURES: [FeatureEntry; 4] = [
    FeatureEntry {
        icon: Icon::Users,
        title: "Talent Pool Access",
        description: "Access our vast database of pre-screened candidates and find the perfect fit for your team.",
    },
    FeatureEntry {
        icon: Icon::BarChart,
        title: "Analytics Dashboard",
        description: "Track your hiring performance with detailed analytics and insights on candidate engagement.",
    },
    FeatureEntry {
        icon: Icon::Shield,
        title: "Verified Candidates",
        description: "All candidates undergo background verification to ensure you're hiring trustworthy professionals.",
    },
    FeatureEntry {
        icon: Icon::Clock,
        title: "Quick Hiring",
        description: "Streamlined hiring process reduces time-to-hire by 60% with automated screening tools.",
    },
];

/// Where "Post a Job" leads: employers to their dashboard, everyone else to login
pub fn post_job_route(viewer: Viewer) -> &'static str {
    match viewer {
        Viewer::Authenticated(Role::Employer) => EMPLOYER_DASHBOARD_ROUTE,
        Viewer::Authenticated(Role::JobSeeker) | Viewer::Anonymous => LOGIN_ROUTE,
    }
}

pub fn hero(viewer: Viewer) -> HeroContent {
    HeroContent {
        headline: "Find Your Dream Job or",
        headline_accent: "Perfect Hire",
        subheading: "Connect talented professionals with innovative companies. \
                     Your next career move or perfect candidate is just one click away.",
        find_jobs: CallToAction {
            label: "Find Jobs",
            route: FIND_JOBS_ROUTE,
        },
        post_job: CallToAction {
            label: "Post a Job",
            route: post_job_route(viewer),
        },
        stats: HERO_STATS.to_vec(),
    }
}

pub fn analytics() -> AnalyticsContent {
    AnalyticsContent {
        title: "Platform",
        title_accent: "Analytics",
        subtitle: "Real-time insights and data-driven results that showcase the power of our \
                   platform in connecting talent with opportunities.",
        entries: ANALYTICS.to_vec(),
    }
}

pub fn features() -> FeaturesContent {
    FeaturesContent {
        title: "Everything You Need to",
        title_accent: "Succeed",
        subtitle: "Whether you're looking for your next opportunity or the perfect candidate, \
                   we have the tools and features to make it happen.",
        job_seekers: JOB_SEEKER_FEATURES.to_vec(),
        employers: EMPLOYER_FEATURES.to_vec(),
    }
}

pub fn footer_for_year(year: i32) -> FooterContent {
    FooterContent {
        brand: BRAND,
        taglines: vec![
            "Connecting talented professionals with innovative companies worldwide.",
            "Your career success is our mission.",
        ],
        copyright: format!("© {year} Time To Program. All rights reserved."),
        credits: "Made with ♥ Happy Coding",
    }
}

pub fn footer() -> FooterContent {
    footer_for_year(Utc::now().year())
}

pub fn landing_page(viewer: Viewer) -> LandingPage {
    LandingPage {
        hero: hero(viewer),
        analytics: analytics(),
        features: features(),
        footer: footer(),
    }
}
