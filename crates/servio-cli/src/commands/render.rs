//! Plain-text rendering of discovery views.

use colored::Colorize;
use servio_core::category::Category;
use servio_core::serviceman::{Candidate, DiscoveryQuery, DiscoveryView, MAX_RATING};

pub fn print_view(title: &str, query: &DiscoveryQuery, view: &DiscoveryView) {
    println!("{}", title.bold());
    println!("{}", summary_line(view).dimmed());
    if let Some(line) = availability_line(view) {
        println!("{}", line.dimmed());
    }
    println!();

    if view.results.is_empty() {
        let message = if query.text.trim().is_empty() {
            "No servicemen found.".to_string()
        } else {
            format!("No servicemen match \"{}\".", query.text.trim())
        };
        println!("{}", message.yellow());
        return;
    }

    println!("{}", query.sort.label().underline());
    for (rank, candidate) in view.results.iter().enumerate() {
        print_candidate(rank + 1, candidate);
    }
}

fn print_candidate(rank: usize, candidate: &Candidate) {
    let name = match candidate.is_available {
        Some(true) => candidate.display_name.green().bold(),
        Some(false) => candidate.display_name.normal().bold(),
        None => candidate.display_name.bold(),
    };
    println!("{:>3}. {}  {}", rank, name, candidate_facts(candidate).dimmed());

    let category = candidate.category_label();
    if !category.is_empty() {
        println!("     {}", category.cyan());
    }
    if !candidate.skills.is_empty() {
        println!("     {}", candidate.skills.join(", "));
    }
}

pub fn summary_line(view: &DiscoveryView) -> String {
    let stats = &view.statistics;
    let mut line = format!(
        "{} servicemen | average rating {:.1}/{}",
        stats.count, stats.average_rating, MAX_RATING
    );
    if let Some(top) = &stats.top_rated {
        line.push_str(&format!(" | top rated: {} ({:.1})", top.display_name, top.rating));
    }
    line
}

pub fn availability_line(view: &DiscoveryView) -> Option<String> {
    view.availability.map(|a| {
        format!(
            "{} available, {} busy, {} total",
            a.available, a.busy, a.total
        )
    })
}

pub fn candidate_facts(candidate: &Candidate) -> String {
    format!(
        "{:.1} rating, {} jobs, {} yrs",
        candidate.rating, candidate.total_jobs_completed, candidate.years_of_experience
    )
}

pub fn category_line(category: &Category) -> String {
    if category.description.trim().is_empty() {
        format!("{:>4}  {}", category.id, category.name.bold())
    } else {
        format!(
            "{:>4}  {}  {}",
            category.id,
            category.name.bold(),
            category.description.trim().dimmed()
        )
    }
}
