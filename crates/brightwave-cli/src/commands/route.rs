use anyhow::Result;

use brightwave_core::{content, Route};

pub fn run(path: &str) -> Result<()> {
    let route = Route::parse(path);
    println!("{} -> {} ({})", path, route.path(), route.label());

    match &route {
        Route::CaseStudy { slug } => match content::case_study(slug) {
            Some(study) => println!("  {}: {}", study.client, study.title),
            None => println!("  No published write-up for \"{}\" yet", slug),
        },
        Route::NotFound { .. } => println!("  No page lives here"),
        Route::Home | Route::Contact => {}
    }

    Ok(())
}
