//! Section renderer: turns a `ProfileCard` into a printable HTML resume card.
//! Sections are emitted only when `ProfileCard::sections` lists them.

pub mod svg;

use std::fmt::Write;

use crate::profile::normalize::ProfileView;
use crate::profile::sections::Section;
use crate::profile::ProfileCard;

pub use svg::render_chart_svg;

pub const LOADING_MESSAGE: &str = "Loading...";

/// The three states of one page load. The server renders only `Failed` and
/// `Ready`; `Loading` is for callers that embed the renderer before data arrives.
#[derive(Debug, Clone)]
pub enum LoadState {
    #[allow(dead_code)]
    Loading,
    Failed(String),
    Ready(Box<ProfileCard>),
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f3f4f6;margin:0;padding:2rem}\
.card{max-width:48rem;margin:0 auto;background:#fff;padding:2rem;border-radius:.5rem}\
.card header{display:flex;gap:1rem;align-items:center}\
.card header img{width:96px;height:96px;border-radius:50%;object-fit:cover}\
.card h2{font-size:1rem;text-transform:uppercase;color:#4b5563;border-bottom:1px solid #e5e7eb}\
.card ul,.card ol{padding-left:1.2rem}\
.hours{font-variant-numeric:tabular-nums;color:#4b5563}\
@media print{body{background:#fff;padding:0}.card{border-radius:0}}";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn render_page(state: &LoadState) -> String {
    let (title, body) = match state {
        LoadState::Loading => ("Profile".to_string(), format!("<p>{LOADING_MESSAGE}</p>")),
        LoadState::Failed(message) => (
            "Profile".to_string(),
            format!("<p>Error : {}</p>", escape_html(message)),
        ),
        LoadState::Ready(card) => (card.profile.identity.full_name.clone(), render_card(card)),
    };

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        escape_html(&title)
    )
}

pub fn render_card(card: &ProfileCard) -> String {
    let mut html = String::from("<main class=\"card\">\n");
    for &section in &card.sections {
        let fragment = match section {
            Section::Identity => render_identity(&card.profile),
            Section::Contact => render_contact(&card.profile),
            Section::Tenure => render_tenure(&card.profile),
            Section::Roles => render_roles(&card.profile),
            Section::Education => render_education(&card.profile),
            Section::Trainings => render_trainings(&card.profile),
            Section::TopProjects => render_top_projects(&card.profile),
            Section::HoursChart => match &card.chart {
                Some(chart) => titled(section, &render_chart_svg(chart)),
                None => String::new(),
            },
        };
        html.push_str(&fragment);
    }
    html.push_str("</main>");
    html
}

fn titled(section: Section, inner: &str) -> String {
    format!(
        "<section class=\"{}\">\n<h2>{}</h2>\n{inner}\n</section>\n",
        section_class(section),
        section.title()
    )
}

fn section_class(section: Section) -> &'static str {
    match section {
        Section::Identity => "identity",
        Section::Contact => "contact",
        Section::Education => "education",
        Section::Trainings => "trainings",
        Section::Roles => "roles",
        Section::Tenure => "tenure",
        Section::TopProjects => "top-projects",
        Section::HoursChart => "hours-chart",
    }
}

fn render_identity(profile: &ProfileView) -> String {
    let identity = &profile.identity;
    let mut html = String::from("<header class=\"identity\">\n");
    if let Some(picture) = &identity.picture {
        let _ = writeln!(
            html,
            "<img src=\"{}\" alt=\"{}\">",
            escape_html(picture),
            escape_html(&identity.full_name)
        );
    }
    let _ = writeln!(html, "<div>\n<h1>{}</h1>", escape_html(&identity.full_name));
    let subtitle: Vec<&str> = [identity.job_title.as_deref(), identity.team.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    if !subtitle.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", escape_html(&subtitle.join(" · ")));
    }
    html.push_str("</div>\n</header>\n");
    html
}

fn render_contact(profile: &ProfileView) -> String {
    let contact = &profile.contact;
    let mut items = vec![format!("<li>{}</li>", escape_html(&contact.phone))];
    if let Some(email) = &contact.email {
        items.push(format!(
            "<li><a href=\"mailto:{0}\">{0}</a></li>",
            escape_html(email)
        ));
    }
    items.push(format!("<li>{}</li>", escape_html(&contact.location)));
    if let Some(address) = &contact.address {
        items.push(format!("<li>{}</li>", escape_html(address)));
    }
    titled(Section::Contact, &format!("<ul>\n{}\n</ul>", items.join("\n")))
}

fn render_tenure(profile: &ProfileView) -> String {
    let tenure = &profile.tenure;
    let mut inner = String::new();
    if let Some(year) = tenure.start_year {
        let _ = writeln!(inner, "<p>Since {year}</p>");
    }
    let _ = write!(
        inner,
        "<p>Previous experience: {}</p>",
        escape_html(&tenure.previous_experience)
    );
    titled(Section::Tenure, &inner)
}

fn render_roles(profile: &ProfileView) -> String {
    let Some(roles) = profile.roles else {
        return String::new();
    };
    let mut items = Vec::new();
    if roles.managed > 0 {
        items.push(format!("<li>Manages {} {}</li>", roles.managed, people(roles.managed)));
    }
    if roles.mentored > 0 {
        items.push(format!("<li>Mentors {} {}</li>", roles.mentored, people(roles.mentored)));
    }
    titled(Section::Roles, &format!("<ul>\n{}\n</ul>", items.join("\n")))
}

fn people(count: u32) -> &'static str {
    if count == 1 {
        "employee"
    } else {
        "employees"
    }
}

fn render_education(profile: &ProfileView) -> String {
    let items: Vec<String> = profile
        .education
        .iter()
        .map(|e| {
            let degrees = escape_html(&e.display_degrees());
            match &e.institution {
                Some(school) => format!("<li><strong>{degrees}</strong> {}</li>", escape_html(school)),
                None => format!("<li><strong>{degrees}</strong></li>"),
            }
        })
        .collect();
    titled(Section::Education, &format!("<ul>\n{}\n</ul>", items.join("\n")))
}

fn render_trainings(profile: &ProfileView) -> String {
    let items: Vec<String> = profile
        .trainings
        .iter()
        .map(|t| format!("<li>{}</li>", escape_html(t)))
        .collect();
    titled(Section::Trainings, &format!("<ul>\n{}\n</ul>", items.join("\n")))
}

fn render_top_projects(profile: &ProfileView) -> String {
    let Some(projects) = &profile.top_projects else {
        return String::new();
    };
    let items: Vec<String> = projects
        .iter()
        .map(|p| {
            format!(
                "<li>{} <span class=\"hours\">{} h</span></li>",
                escape_html(&p.name),
                p.hours
            )
        })
        .collect();
    titled(Section::TopProjects, &format!("<ol>\n{}\n</ol>", items.join("\n")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::build_card;
    use crate::profile::normalize::NormalizeOptions;
    use crate::profile::query::QuerySettings;
    use crate::profile::raw::RawEmployee;
    use serde_json::json;

    fn card(overrides: serde_json::Value) -> ProfileCard {
        let mut base = json!({
            "profilePicture": "https://cdn.example.com/a.png",
            "byname": "Ada",
            "lastName": "Lovelace",
            "jobTitle": "Developer",
            "team": { "name": "Indirect" },
            "email": "ada@example.com",
            "office": null,
            "workPhone": null,
            "trainings": ["Security <basics>"],
            "education": { "edges": [
                { "node": { "degrees": ["BSc", "MSc"], "almaMater": { "name": "McGill" } } }
            ] },
            "topProjects": { "totalCount": 0, "edges": [] },
            "currentYearHours": { "edges": [] },
            "priorYearHours": { "edges": [] },
            "mentoredEmployeesCount": { "totalCount": 0 },
            "managedEmployeesCount": { "totalCount": 0 }
        });
        if let (Some(base), Some(over)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in over {
                base.insert(k.clone(), v.clone());
            }
        }
        let raw: RawEmployee = serde_json::from_value(base).unwrap();
        build_card(&raw, &NormalizeOptions::default(), &QuerySettings::default())
    }

    #[test]
    fn test_loading_and_error_placeholders() {
        assert!(render_page(&LoadState::Loading).contains("<p>Loading...</p>"));
        let page = render_page(&LoadState::Failed("Token expired".to_string()));
        assert!(page.contains("<p>Error : Token expired</p>"));
    }

    #[test]
    fn test_error_message_is_escaped() {
        let page = render_page(&LoadState::Failed("<script>".to_string()));
        assert!(page.contains("Error : &lt;script&gt;"));
        assert!(!page.contains("<script>"));
    }

    #[test]
    fn test_zero_state_sections_are_omitted() {
        let html = render_card(&card(json!({})));
        assert!(!html.contains("class=\"roles\""));
        assert!(!html.contains("class=\"top-projects\""));
        assert!(!html.contains("class=\"hours-chart\""));
        assert!(!html.contains("<svg"));
        assert!(html.contains("class=\"contact\""));
    }

    #[test]
    fn test_card_shows_normalized_values() {
        let html = render_card(&card(json!({})));
        assert!(html.contains("<h1>Ada Lovelace</h1>"));
        assert!(html.contains("Developer · Support"));
        assert!(html.contains("<li>Remote</li>"));
        assert!(html.contains("<li>555-555-5555</li>"));
        assert!(html.contains("<strong>Bsc • msc</strong> McGill"));
        assert!(html.contains("Security &lt;basics&gt;"));
        assert!(html.contains("No previous experience"));
    }

    #[test]
    fn test_roles_list_skips_zero_counts() {
        let html = render_card(&card(json!({
            "managedEmployeesCount": { "totalCount": 1 },
            "mentoredEmployeesCount": { "totalCount": 0 }
        })));
        assert!(html.contains("<li>Manages 1 employee</li>"));
        assert!(!html.contains("Mentors"));
    }

    #[test]
    fn test_top_projects_and_chart_rendered_when_present() {
        let html = render_card(&card(json!({
            "topProjects": { "totalCount": 1, "edges": [
                { "node": { "hours": "99.5", "project": { "name": "Bar", "parentProject": { "name": "Foo" } } } }
            ] },
            "currentYearHours": { "edges": [
                { "node": { "hours": 120, "datePeriod": { "midpoint": "2023-01-16" } } }
            ] }
        })));
        assert!(html.contains("<li>Foo <span class=\"hours\">100 h</span></li>"));
        assert!(html.contains("class=\"hours-chart\""));
        assert!(html.contains("<polyline"));
    }

    #[test]
    fn test_page_title_is_employee_name() {
        let page = render_page(&LoadState::Ready(Box::new(card(json!({})))));
        assert!(page.contains("<title>Ada Lovelace</title>"));
        assert!(page.starts_with("<!DOCTYPE html>"));
    }
}
