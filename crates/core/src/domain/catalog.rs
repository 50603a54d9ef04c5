use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AddOnId(pub String);

impl AddOnId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePackage {
    pub id: PackageId,
    pub name: String,
    /// Whole currency units, no minor unit.
    pub price: u64,
    pub description: String,
    pub features: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub packages: Vec<ServicePackage>,
}

impl Service {
    pub fn package(&self, package_id: &PackageId) -> Option<&ServicePackage> {
        self.packages.iter().find(|package| &package.id == package_id)
    }

    pub fn owns(&self, package: &ServicePackage) -> bool {
        self.package(&package.id).is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    pub price: u64,
    pub description: String,
}

/// Read-only reference data: services with their packages, plus the add-on list.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    services: Vec<Service>,
    add_ons: Vec<AddOn>,
}

impl Catalog {
    pub fn new(services: Vec<Service>, add_ons: Vec<AddOn>) -> Self {
        Self { services, add_ons }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn add_ons(&self) -> &[AddOn] {
        &self.add_ons
    }

    pub fn find_service(&self, service_id: &ServiceId) -> Option<&Service> {
        self.services.iter().find(|service| &service.id == service_id)
    }

    /// Resolves a package together with the service that owns it.
    pub fn find_package(&self, package_id: &PackageId) -> Option<(&Service, &ServicePackage)> {
        self.services
            .iter()
            .find_map(|service| service.package(package_id).map(|package| (service, package)))
    }

    pub fn find_add_on(&self, add_on_id: &AddOnId) -> Option<&AddOn> {
        self.add_ons.iter().find(|add_on| &add_on.id == add_on_id)
    }

    /// The agency's published service list.
    pub fn standard() -> Self {
        Self::new(standard_services(), standard_add_ons())
    }
}

pub const BUSINESS_TYPES: &[&str] = &[
    "Small Business",
    "Startup",
    "NGO/Non-profit",
    "Artist/Creative",
    "E-commerce Store",
    "Restaurant/Cafe",
    "Salon/Beauty",
    "Consulting Firm",
    "Other",
];

pub const INDUSTRIES: &[&str] = &[
    "Technology",
    "Healthcare",
    "Education",
    "Finance",
    "Retail",
    "Food & Beverage",
    "Beauty & Wellness",
    "Real Estate",
    "Entertainment",
    "Non-profit",
    "Other",
];

fn package(id: &str, name: &str, price: u64, description: &str, features: &[&str]) -> ServicePackage {
    ServicePackage {
        id: PackageId(id.to_string()),
        name: name.to_string(),
        price,
        description: description.to_string(),
        features: features.iter().map(|feature| feature.to_string()).collect(),
    }
}

fn service(
    id: &str,
    name: &str,
    description: &str,
    icon: &str,
    packages: Vec<ServicePackage>,
) -> Service {
    Service {
        id: ServiceId(id.to_string()),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        packages,
    }
}

fn add_on(id: &str, name: &str, price: u64, description: &str) -> AddOn {
    AddOn {
        id: AddOnId(id.to_string()),
        name: name.to_string(),
        price,
        description: description.to_string(),
    }
}

fn standard_services() -> Vec<Service> {
    vec![
        service(
            "web-design",
            "Web Design & Development",
            "Professional websites that convert visitors into customers",
            "🌐",
            vec![
                package(
                    "web-starter",
                    "Starter Website",
                    25_000,
                    "Perfect for small businesses and personal brands",
                    &[
                        "Up to 5 pages",
                        "Mobile responsive design",
                        "Contact form",
                        "Basic SEO setup",
                        "1 month support",
                        "2 rounds of revisions",
                    ],
                ),
                package(
                    "web-standard",
                    "Standard Website",
                    45_000,
                    "Ideal for growing businesses with more complex needs",
                    &[
                        "Up to 10 pages",
                        "Mobile responsive design",
                        "Contact forms & newsletter signup",
                        "Advanced SEO optimization",
                        "Google Analytics integration",
                        "3 months support",
                        "3 rounds of revisions",
                        "Content management system",
                    ],
                ),
                package(
                    "web-premium",
                    "Premium Website",
                    75_000,
                    "Full-featured websites for established businesses",
                    &[
                        "Unlimited pages",
                        "Custom design & animations",
                        "E-commerce functionality",
                        "Advanced integrations",
                        "Performance optimization",
                        "6 months support",
                        "Unlimited revisions",
                        "Admin dashboard",
                        "Multi-language support",
                    ],
                ),
            ],
        ),
        service(
            "graphics",
            "Graphics & Branding",
            "Visual identity that makes your brand memorable",
            "🎨",
            vec![
                package(
                    "graphics-starter",
                    "Brand Starter",
                    15_000,
                    "Essential branding for new businesses",
                    &[
                        "Logo design (3 concepts)",
                        "Business card design",
                        "Letterhead design",
                        "Color palette",
                        "Typography guide",
                        "2 rounds of revisions",
                    ],
                ),
                package(
                    "graphics-standard",
                    "Brand Standard",
                    30_000,
                    "Comprehensive branding package",
                    &[
                        "Logo design (5 concepts)",
                        "Complete brand identity",
                        "Business stationery set",
                        "Social media templates",
                        "Brand guidelines document",
                        "3 rounds of revisions",
                        "File formats (AI, EPS, PNG, JPG)",
                    ],
                ),
                package(
                    "graphics-premium",
                    "Brand Premium",
                    50_000,
                    "Full brand ecosystem development",
                    &[
                        "Logo design (unlimited concepts)",
                        "Complete brand identity system",
                        "Marketing materials design",
                        "Website mockups",
                        "Brand guidelines & style guide",
                        "Unlimited revisions",
                        "All file formats",
                        "Brand consultation session",
                    ],
                ),
            ],
        ),
        service(
            "social-media",
            "Social Media Management",
            "Engaging content that builds your community",
            "📱",
            vec![
                package(
                    "social-starter",
                    "Social Starter",
                    20_000,
                    "Essential social media presence",
                    &[
                        "2 platforms (Facebook & Instagram)",
                        "15 posts per month",
                        "Basic graphics & captions",
                        "Hashtag research",
                        "Monthly analytics report",
                        "Community management",
                    ],
                ),
                package(
                    "social-standard",
                    "Social Standard",
                    35_000,
                    "Comprehensive social media strategy",
                    &[
                        "3 platforms (Facebook, Instagram, Twitter)",
                        "25 posts per month",
                        "Custom graphics & videos",
                        "Content calendar",
                        "Engagement strategies",
                        "Weekly analytics reports",
                        "Influencer outreach",
                    ],
                ),
                package(
                    "social-premium",
                    "Social Premium",
                    55_000,
                    "Full-service social media management",
                    &[
                        "All major platforms",
                        "40+ posts per month",
                        "Video content creation",
                        "Paid advertising management",
                        "Influencer partnerships",
                        "Daily analytics monitoring",
                        "Crisis management",
                        "Strategy consultation",
                    ],
                ),
            ],
        ),
        service(
            "bundles",
            "Complete Packages",
            "All-in-one solutions for maximum impact",
            "🚀",
            vec![
                package(
                    "bundle-starter",
                    "Business Starter",
                    50_000,
                    "Everything you need to launch your business online",
                    &[
                        "Starter website (5 pages)",
                        "Basic branding package",
                        "Social media setup",
                        "Google My Business setup",
                        "Basic SEO optimization",
                        "3 months support",
                    ],
                ),
                package(
                    "bundle-standard",
                    "Business Growth",
                    90_000,
                    "Comprehensive digital presence for growing businesses",
                    &[
                        "Standard website (10 pages)",
                        "Complete branding package",
                        "3 months social media management",
                        "Advanced SEO setup",
                        "Analytics & reporting",
                        "6 months support",
                    ],
                ),
                package(
                    "bundle-premium",
                    "Business Elite",
                    150_000,
                    "Premium digital ecosystem for established businesses",
                    &[
                        "Premium website (unlimited pages)",
                        "Full brand ecosystem",
                        "6 months social media management",
                        "E-commerce integration",
                        "Paid advertising setup",
                        "12 months support",
                        "Priority support & consultation",
                    ],
                ),
            ],
        ),
    ]
}

fn standard_add_ons() -> Vec<AddOn> {
    vec![
        add_on("seo-optimization", "SEO Optimization", 10_000, "Advanced search engine optimization"),
        add_on(
            "content-creation",
            "Content Creation",
            15_000,
            "Professional copywriting and content strategy",
        ),
        add_on("photography", "Professional Photography", 20_000, "Product and lifestyle photography"),
        add_on("video-production", "Video Production", 25_000, "Promotional and explainer videos"),
        add_on(
            "email-marketing",
            "Email Marketing Setup",
            8_000,
            "Newsletter design and automation setup",
        ),
        add_on(
            "analytics-setup",
            "Analytics & Tracking",
            5_000,
            "Google Analytics and conversion tracking setup",
        ),
    ]
}
