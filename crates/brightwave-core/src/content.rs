//! Static site content: copy, client list, services and case studies.

/// A service the agency sells; also the choices of the contact form's
/// "service interest" field
pub const SERVICES: &[&str] = &[
    "Brand Strategy",
    "Performance Marketing",
    "Social Media",
    "Content Production",
    "Web Design",
    "SEO",
];

/// Budget ranges offered by the contact form
pub const BUDGETS: &[&str] = &[
    "< $10k",
    "$10k - $25k",
    "$25k - $50k",
    "$50k - $100k",
    "$100k+",
];

/// Client names shown in the logo marquee
pub const CLIENTS: &[&str] = &[
    "Northwind",
    "Lumen & Co",
    "Atlas Outdoor",
    "Pinecrest",
    "Halcyon",
    "Vela Studio",
    "Orbit Coffee",
    "Kestrel Bank",
];

/// Items on the rotating rings, innermost ring first
pub const RING_ITEMS: &[&[&str]] = &[
    &["Strategy", "Growth", "Craft"],
    &["Paid Social", "Search", "Email", "Video", "Print"],
    &[
        "Launches", "Rebrands", "Campaigns", "Content", "Analytics", "Community", "Partnerships",
    ],
];

pub const HERO_TITLE: &str = "We make brands impossible to scroll past.";
pub const HERO_SUBTITLE: &str = "Strategy, creative and media for companies that want to be noticed.";

pub const ABOUT_TEXT: &str = "Brightwave is an independent studio of strategists, designers and \
media buyers. We build campaigns that earn attention and measure what it is worth.";

/// A published case study
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseStudy {
    pub slug: &'static str,
    pub client: &'static str,
    pub title: &'static str,
    pub summary: &'static str,
}

pub const CASE_STUDIES: &[CaseStudy] = &[
    CaseStudy {
        slug: "atlas-outdoor",
        client: "Atlas Outdoor",
        title: "Taking a heritage brand off-trail",
        summary: "A full rebrand and launch campaign that doubled direct sales in one season.",
    },
    CaseStudy {
        slug: "orbit-coffee",
        client: "Orbit Coffee",
        title: "Subscription growth in a crowded cup",
        summary: "Paid social and lifecycle email that tripled subscription sign-ups.",
    },
    CaseStudy {
        slug: "kestrel-bank",
        client: "Kestrel Bank",
        title: "Making a bank feel local again",
        summary: "Community-led content and search that lifted branch visits by 40%.",
    },
    CaseStudy {
        slug: "halcyon",
        client: "Halcyon",
        title: "A calmer launch for a sleep app",
        summary: "Creator partnerships and video that reached two million people in a month.",
    },
];

/// Look up a case study for decoration; unknown slugs are still valid pages
pub fn case_study(slug: &str) -> Option<&'static CaseStudy> {
    CASE_STUDIES.iter().find(|c| c.slug == slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_study_lookup() {
        assert_eq!(case_study("halcyon").map(|c| c.client), Some("Halcyon"));
        assert!(case_study("unknown-slug").is_none());
    }

    #[test]
    fn test_rings_not_empty() {
        assert!(RING_ITEMS.iter().all(|ring| !ring.is_empty()));
    }
}
