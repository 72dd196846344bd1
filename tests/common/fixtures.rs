//! Catalog and resume fixtures.

use recommender::{Posting, Resume};

pub fn sample_postings() -> Vec<Posting> {
    [
        (
            "Backend Engineering Intern",
            "Acme",
            "Berlin",
            "Design and build REST services in Rust backed by PostgreSQL",
            "Rust, SQL, HTTP APIs",
        ),
        (
            "Data Analyst Intern",
            "Globex",
            "Remote",
            "Analyse product metrics and build dashboards",
            "Python, pandas, statistics",
        ),
        (
            "Machine Learning Intern",
            "Initech",
            "Bangalore",
            "Train and evaluate ranking models",
            "PyTorch, embeddings, evaluation",
        ),
        (
            "Frontend Intern",
            "Umbrella",
            "Remote",
            "Ship React features for the customer portal",
            "TypeScript, React, CSS",
        ),
        (
            "Cloud Operations Intern",
            "Hooli",
            "Dublin",
            "Automate deployments and maintain CI pipelines",
            "Docker, Kubernetes, Terraform",
        ),
        (
            "Security Intern",
            "Vandelay",
            "Remote",
            "Review service code and run threat models",
            "Rust, threat modelling, OWASP",
        ),
    ]
    .into_iter()
    .map(
        |(title, company, location, description, requirements)| Posting {
            title: title.to_string(),
            company: company.to_string(),
            location: location.to_string(),
            description: description.to_string(),
            requirements: requirements.to_string(),
        },
    )
    .collect()
}

pub fn sample_resume() -> Resume {
    Resume {
        summary: "Computer science student focused on backend systems".to_string(),
        skills: "Rust, SQL, HTTP APIs".to_string(),
        education: "BSc Computer Science".to_string(),
        projects: "Key-value store and a REST API in Rust".to_string(),
        experience: "Design and build REST services in Rust backed by PostgreSQL".to_string(),
        certifications: String::new(),
    }
}

pub fn sample_resume_json() -> serde_json::Value {
    serde_json::to_value(sample_resume()).unwrap()
}
