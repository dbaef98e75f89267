//! One formatter per CV section.
//!
//! Each formatter returns `None` when the CV has no data for it, so the
//! table of contents only lists sections that exist.

use super::format::{
    clean_text, entries, format_pages, format_volume_issue, strings, year_range, Entry, LEADING_WS,
};
use super::CvSection;
use crate::config::ServiceSection;
use crate::github::{validate_repo, RepoInfo};
use serde_yaml::Value;
use std::collections::HashMap;

const MIDDOT: &str = " ⋅ ";

/// Everything a section formatter may look at
pub struct SectionContext<'a> {
    pub data: &'a Value,
    /// Name that marks the CV owner as a PhD supervisor
    pub owner: &'a str,
    pub repos: &'a HashMap<String, RepoInfo>,
    pub university_service: &'a [ServiceSection],
}

type Formatter = fn(&SectionContext) -> Option<CvSection>;

/// Every section of the CV, in page order
pub fn build_sections(ctx: &SectionContext) -> Vec<CvSection> {
    const BEFORE_SERVICE: &[Formatter] = &[
        contact,
        areas,
        education,
        appointments,
        leaves,
        affiliations,
        books,
        articles,
        chapters,
        special_issues,
        reports,
        manuscripts,
        misc,
        grants,
        teaching_grants,
        awards,
        contracts,
        software,
        other_software,
        conferences,
        invited,
        courses,
        reading,
        phd,
        masters,
        hqp,
        other_grad,
        undergraduate,
        profession,
        sessions,
        peer_review,
    ];
    const AFTER_SERVICE: &[Formatter] = &[training, rata, memberships];

    let mut sections: Vec<CvSection> = BEFORE_SERVICE.iter().filter_map(|f| f(ctx)).collect();
    sections.extend(
        ctx.university_service
            .iter()
            .filter_map(|service| university_service(ctx, service)),
    );
    sections.extend(AFTER_SERVICE.iter().filter_map(|f| f(ctx)));
    sections
}

fn ordered(items: &[String]) -> String {
    format!("<ol reversed>\n{}\n</ol>", items.join("\n"))
}

/// Numbered-list section, skipped when there are no items
fn list_section(title: &str, items: Vec<String>) -> Option<CvSection> {
    if items.is_empty() {
        return None;
    }
    Some(CvSection::new(title, ordered(&items)))
}

/// Section built from every entry under `key`
fn entry_list<F>(ctx: &SectionContext, key: &str, title: &str, item: F) -> Option<CvSection>
where
    F: Fn(Entry) -> String,
{
    list_section(title, entries(ctx.data, key).into_iter().map(item).collect())
}

fn scalar(data: &Value, key: &str) -> String {
    Entry::new(data).raw(key)
}

fn contact(ctx: &SectionContext) -> Option<CvSection> {
    let address = strings(ctx.data, "address").join("<br>");
    let urls = strings(ctx.data, "urls").join("<br>");
    let email = scalar(ctx.data, "email");
    let phone = scalar(ctx.data, "phone");

    let mut body = String::new();
    if !address.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", address));
    }
    body.push_str("<p>\n");
    if !email.is_empty() {
        body.push_str(&format!("<a href=\"mailto:{0}\">{0}</a>\n", email));
    }
    if !phone.is_empty() {
        body.push_str(&format!("<br>\n{}\n", phone));
    }
    body.push_str("</p>\n");
    if !urls.is_empty() {
        body.push_str(&format!("<p>{}</p>\n", urls));
    }

    Some(CvSection::new("Contact Information", body))
}

fn dotted_paragraph(ctx: &SectionContext, key: &str, title: &str) -> Option<CvSection> {
    let items = strings(ctx.data, key);
    if items.is_empty() {
        return None;
    }
    Some(CvSection::new(
        title,
        format!("<p>{}</p>", clean_text(&items.join(MIDDOT))),
    ))
}

fn areas(ctx: &SectionContext) -> Option<CvSection> {
    dotted_paragraph(ctx, "areas", "Research Areas")
}

fn memberships(ctx: &SectionContext) -> Option<CvSection> {
    dotted_paragraph(ctx, "memberships", "Professional Memberships")
}

fn education(ctx: &SectionContext) -> Option<CvSection> {
    let items: Vec<String> = entries(ctx.data, "education")
        .into_iter()
        .map(|e| {
            format!(
                "<p>{} | <strong>{}</strong><br>{}{}, {}</p>",
                e.raw("year"),
                e.text("subject"),
                LEADING_WS,
                e.text("institute"),
                e.text("city")
            )
        })
        .collect();
    paragraphs("Education", items, false)
}

/// Paragraph-per-entry section; `ranges` rewrites `--` in the whole body
fn paragraphs(title: &str, items: Vec<String>, ranges: bool) -> Option<CvSection> {
    if items.is_empty() {
        return None;
    }
    let body = items.join("\n");
    let body = if ranges { year_range(&body) } else { body };
    Some(CvSection::new(title, body))
}

fn appointments(ctx: &SectionContext) -> Option<CvSection> {
    let items: Vec<String> = entries(ctx.data, "appointments")
        .into_iter()
        .map(|e| {
            let mut item = format!(
                "\n<p>{} | <strong>{}</strong><br>\n",
                e.raw("years"),
                e.text("job")
            );
            if e.has("notes") {
                item.push_str(&format!("{}{}<br>", LEADING_WS, e.raw("notes")));
            }
            item.push_str(&format!(
                "\n{}{}, {}<br>\n",
                LEADING_WS,
                e.text("department"),
                e.text("faculty")
            ));
            if e.has("cross") {
                item.push_str(&format!("{}{}<br>", LEADING_WS, e.raw("cross")));
            }
            item.push_str(&format!("{}{}</p>", LEADING_WS, e.text("employer")));
            item
        })
        .collect();
    paragraphs("Academic Appointments", items, true)
}

fn leaves(ctx: &SectionContext) -> Option<CvSection> {
    let items: Vec<String> = entries(ctx.data, "leaves")
        .into_iter()
        .map(|e| {
            format!(
                "<p>{} | <strong>{}</strong><br>{}{}</p>",
                e.raw("years"),
                e.text("type"),
                LEADING_WS,
                e.raw("employer")
            )
        })
        .collect();
    paragraphs("Leaves", items, true).map(CvSection::subsection)
}

fn affiliations(ctx: &SectionContext) -> Option<CvSection> {
    let items: Vec<String> = entries(ctx.data, "affiliations")
        .into_iter()
        .map(|e| {
            let mut item = format!(
                "<p>{} | <strong>{}</strong><br>",
                e.raw("years"),
                e.text("role")
            );
            item.push_str(
                &format!("{}{}", LEADING_WS, e.text("organization"))
                    .replace(": ", &format!("<br>{}", LEADING_WS)),
            );
            if e.has("notes") {
                item.push_str(&format!("<br>{}{}", LEADING_WS, e.raw("notes")));
            }
            item.push_str("</p>");
            item
        })
        .collect();
    paragraphs("Affiliations", items, true)
}

fn books(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "books", "Books", |e| {
        let link = if e.has("ilink") {
            format!(" <a href=\"{}\">[link]</a>", e.raw("ilink"))
        } else {
            String::new()
        };
        format!(
            "<li>{}. {}. <em>{}</em>. {}: {}.{}</li>",
            e.text("authors"),
            e.raw("year"),
            e.text("title"),
            e.text("press"),
            e.text("city"),
            link
        )
    })
}

fn articles(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "articles", "Peer-Reviewed Articles", |e| {
        format!(
            "<li>{}. {}. \"{}.\" <em>{}</em>{}{}.</li>",
            e.text("authors"),
            e.raw("year"),
            e.text("title"),
            e.text("journal"),
            format_volume_issue(&e.raw("volume"), &e.raw("issue")),
            format_pages(&e.raw("pages"))
        )
    })
}

fn chapters(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "chapters", "Book Chapters", |e| {
        let oa_link = if e.has("oa") {
            format!(" <a href=\"{}\">[open access]</a>", e.raw("oa"))
        } else {
            String::new()
        };
        format!(
            "<li>{}. {}. \"{}.\" In {} (Eds.), <em>{}</em>. {}: {}.{}</li>",
            e.text("authors"),
            e.raw("year"),
            e.text("title"),
            e.text("editors"),
            e.text("book"),
            e.text("press"),
            e.text("city"),
            oa_link
        )
    })
}

fn special_issues(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "issues", "Edited Special Issues", |e| {
        format!(
            "<li>{} (Eds.). {}. \"{}.\" <em>{}</em>.</li>",
            e.text("editors"),
            e.raw("year"),
            e.text("theme"),
            e.text("journal")
        )
    })
}

fn reports(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "reports", "Research Reports", |e| {
        format!(
            "<li>{}. {}. \"{}.\" {}.</li>",
            e.text("authors"),
            e.raw("year"),
            e.text("report"),
            e.text("client")
        )
    })
}

fn manuscripts(ctx: &SectionContext) -> Option<CvSection> {
    let mut items: Vec<String> = entries(ctx.data, "article-manuscripts")
        .into_iter()
        .map(|e| {
            format!(
                "<li>{}. \"{}.\" {}.</li>",
                e.text("authors"),
                e.text("title"),
                e.raw_or("status", "In Progress")
            )
        })
        .collect();
    items.extend(entries(ctx.data, "book-manuscripts").into_iter().map(|e| {
        format!(
            "<li>{}. <em>{}</em>. {}.</li>",
            e.text("authors"),
            e.text("title"),
            e.raw_or("status", "In Progress")
        )
    }));
    list_section("Manuscripts in Progress", items)
}

fn misc(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "misc", "Other Publications", |e| {
        format!(
            "<li>{}. {}. \"{}.\" {}</li>",
            e.text("authors"),
            e.raw("year"),
            e.text("title"),
            e.text("details")
        )
    })
}

fn grants(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "grants", "Research Grants", |e| {
        let mut item = format!("<li><strong>{}</strong> <br>", e.text("title"));
        item.push_str(&format!(
            "{}. PI: {}. {}. {}<br>",
            year_range(&e.raw("years")),
            e.text("pi"),
            e.text("grant"),
            e.raw("amount")
        ));
        if e.has("ci") {
            item.push_str(&format!("CI: {}.<br>", e.raw("ci")));
        }
        if e.has("collaborators") {
            item.push_str(&format!("CO: {}.", e.raw("collaborators")));
        }
        item.push_str("</li>");
        item
    })
}

fn teaching_grants(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "teachinggrants", "Teaching Grants", |e| {
        format!(
            "<li>{}. \"{}.\" {}. {}.</li>",
            year_range(&e.raw("years")),
            e.text("title"),
            e.text("grant"),
            e.raw("amount")
        )
    })
}

fn awards(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "awards", "Awards and Scholarships", |e| {
        let amount = if e.has("amount") {
            format!(" ({})", e.raw("amount"))
        } else {
            String::new()
        };
        year_range(&format!(
            "<li>{}. {}. {}{}.</li>",
            e.raw("year"),
            e.text("award"),
            e.text("organization"),
            amount
        ))
    })
}

fn contracts(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "contracts", "Research Contracts", |e| {
        format!(
            "<li>{}. \"{}.\" {}.</li>",
            year_range(&e.raw("years")),
            e.text("title"),
            e.text("organization")
        )
    })
}

/// ` <a href="…">GitHub</a> (★ 12)` for entries naming a valid repository
fn github_badge(ctx: &SectionContext, e: &Entry) -> String {
    let raw = e.raw("github");
    let repo = raw.trim();
    if repo.is_empty() || validate_repo(repo).is_err() {
        return String::new();
    }
    match ctx.repos.get(repo) {
        Some(info) => format!(
            " <a href=\"{}\" class=\"gh-link\">GitHub</a> <span class=\"gh-stars\">(★ {})</span>",
            info.html_url, info.stars
        ),
        None => format!(
            " <a href=\"https://github.com/{}\" class=\"gh-link\">GitHub</a>",
            repo
        ),
    }
}

fn software(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "software", "Software", |e| {
        format!(
            "<li><strong>{}</strong>. {}. License: {}. Development: {}.{}</li>",
            e.raw("package"),
            e.text("description"),
            e.raw("license"),
            e.text("development"),
            github_badge(ctx, &e)
        )
    })
}

fn other_software(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "othersoftware", "Software Contributions", |e| {
        format!(
            "<li><strong>{}</strong>. {}.{}</li>",
            e.raw("package"),
            e.text("description"),
            github_badge(ctx, &e)
        )
    })
}

/// Talks sorted newest first, with year-month dates
fn talks(ctx: &SectionContext, key: &str, title: &str) -> Option<CvSection> {
    let mut talks = entries(ctx.data, key);
    talks.sort_by_key(|e| std::cmp::Reverse(e.raw("year")));

    let items = talks
        .into_iter()
        .map(|e| {
            let year: String = e.raw("year").chars().take(7).collect();
            format!(
                "<li>{}. {}. \"{}.\" {}. {}.</li>",
                e.text("authors"),
                year,
                e.text("title"),
                e.text("conference"),
                e.text("location")
            )
        })
        .collect();
    list_section(title, items)
}

fn conferences(ctx: &SectionContext) -> Option<CvSection> {
    talks(ctx, "conferences", "Conference Presentations")
}

fn invited(ctx: &SectionContext) -> Option<CvSection> {
    talks(ctx, "invited", "Invited Talks")
}

fn courses(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "courses", "Courses Taught", |e| {
        format!(
            "<li>{}. {}: {} ({}).</li>",
            e.raw("year"),
            e.raw("id"),
            e.text("name"),
            e.raw("level")
        )
    })
}

fn reading(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "reading", "Directed Reading Courses", |e| {
        let who = if e.has("who") {
            format!(" ({})", e.text("who"))
        } else {
            String::new()
        };
        format!(
            "<li>{}. {} ({}){}.</li>",
            e.raw("year"),
            e.text("name"),
            e.raw("level"),
            who
        )
    })
}

fn phd(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "phd", "PhD Supervision", |e| {
        let status = if e.has("status") {
            format!(" ({})", e.raw("status"))
        } else {
            String::new()
        };
        let dissertation = if e.has("dissertation") {
            format!(" Dissertation: \"{}\".", e.text("dissertation"))
        } else {
            String::new()
        };
        let role = if e.raw("supervisor") == ctx.owner {
            "Supervisor".to_string()
        } else {
            format!("Committee Member (Supervisor: {})", e.text("supervisor"))
        };
        format!(
            "<li>{}{}. {}. {}. Committee: {}.{}</li>",
            e.text("student"),
            status,
            e.text("department"),
            role,
            e.text("committee"),
            dissertation
        )
    })
}

fn masters(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "masters", "Masters Supervision", |e| {
        let thesis = if e.has("thesis") {
            format!(" \"{}\".", e.text("thesis"))
        } else {
            String::new()
        };
        format!(
            "<li>{} ({}). {}, {}. {}.{}</li>",
            e.text("student"),
            e.raw("status"),
            e.raw("degree"),
            e.text("department"),
            e.raw("role"),
            thesis
        )
    })
}

fn hqp(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "hqp", "Research Assistants (HQP)", |e| {
        let gra = if e.has("gra") {
            format!(" Graduate RAs: {}.", e.text("gra"))
        } else {
            String::new()
        };
        let ura = if e.has("ura") {
            format!(" Undergraduate RAs: {}.", e.text("ura"))
        } else {
            String::new()
        };
        format!("<li>{}.{}{}</li>", e.raw("year"), gra, ura)
    })
}

fn other_grad(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "othergrad", "Graduate Training and Workshops", |e| {
        format!("<li>{}. {}.</li>", e.raw("year"), e.text("training"))
    })
}

fn undergraduate(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "undergraduate", "Undergraduate Thesis Supervision", |e| {
        format!(
            "<li>{}. {}. {}. \"{}\".</li>",
            e.raw("year"),
            e.text("student"),
            e.text("department"),
            e.text("thesis")
        )
    })
}

/// `<li>{years}. {role}.</li>` lists keyed on a `year` range
fn role_list(ctx: &SectionContext, key: &str, title: &str) -> Option<CvSection> {
    entry_list(ctx, key, title, |e| {
        format!("<li>{}. {}.</li>", year_range(&e.raw("year")), e.text("role"))
    })
}

fn profession(ctx: &SectionContext) -> Option<CvSection> {
    role_list(ctx, "profession", "Professional Service")
}

fn university_service(ctx: &SectionContext, service: &ServiceSection) -> Option<CvSection> {
    role_list(
        ctx,
        &service.key,
        &format!("University Service ({})", service.institution),
    )
}

fn sessions(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "sessions", "Conference Sessions Organized", |e| {
        let panelists = if e.has("panelists") {
            format!(" Panelists: {}.", e.text("panelists"))
        } else {
            String::new()
        };
        format!("<li>{}. {}.{}</li>", e.raw("year"), e.text("session"), panelists)
    })
}

fn peer_review(ctx: &SectionContext) -> Option<CvSection> {
    let mut items = Vec::new();

    let journals: Vec<String> = entries(ctx.data, "prarticles")
        .into_iter()
        .map(|j| j.text("journal"))
        .collect();
    if !journals.is_empty() {
        items.push(format!("<li>Journal Articles: {}.</li>", journals.join(", ")));
    }
    items.extend(
        entries(ctx.data, "prbooks")
            .into_iter()
            .map(|b| format!("<li>{}. {}.</li>", b.raw("year"), b.text("book"))),
    );
    items.extend(
        entries(ctx.data, "prgrants")
            .into_iter()
            .map(|g| format!("<li>{}. {}.</li>", g.raw("year"), g.text("grant"))),
    );

    list_section("Peer Review", items)
}

fn training(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "training", "Professional Development", |e| {
        format!("<li>{}. {}.</li>", e.raw("year"), e.text("training"))
    })
}

fn rata(ctx: &SectionContext) -> Option<CvSection> {
    entry_list(ctx, "rata", "Research and Teaching Assistantships", |e| {
        format!("<li>{}. {}.</li>", e.raw("year"), e.text("position"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn build(yaml: &str) -> Vec<CvSection> {
        let data = data(yaml);
        let repos = HashMap::new();
        let services = crate::config::CvConfig::default().university_service;
        let ctx = SectionContext {
            data: &data,
            owner: "John McLevey",
            repos: &repos,
            university_service: &services,
        };
        build_sections(&ctx)
    }

    fn section<'a>(sections: &'a [CvSection], title: &str) -> &'a CvSection {
        sections
            .iter()
            .find(|s| s.title == title)
            .unwrap_or_else(|| panic!("missing section {}", title))
    }

    #[test]
    fn test_contact_is_always_present() {
        let sections = build("{}");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Contact Information");
        assert_eq!(sections[0].body, "<p>\n</p>\n");
    }

    #[test]
    fn test_contact_details() {
        let sections = build(
            "address: [Dept of Sociology, University of Waterloo]\nemail: jm@example.com\nphone: 555-1234\nurls: [example.com]\n",
        );
        insta::assert_snapshot!(sections[0].body, @r#"
        <p>Dept of Sociology<br>University of Waterloo</p>
        <p>
        <a href="mailto:jm@example.com">jm@example.com</a>
        <br>
        555-1234
        </p>
        <p>example.com</p>
        "#);
    }

    #[test]
    fn test_article_formatting() {
        let sections = build(
            "articles:\n  - authors: McLevey, J. and *Doe, J.*\n    year: 2021\n    title: Networks\n    journal: Social Networks\n    volume: 12\n    issue: 3\n    pages: 1-20\n  - authors: McLevey, J.\n    year: 2019\n    title: Text\n    journal: Poetics\n",
        );
        let articles = section(&sections, "Peer-Reviewed Articles");
        assert_eq!(articles.id, "peer-reviewed-articles");
        insta::assert_snapshot!(articles.body, @r#"
        <ol reversed>
        <li>McLevey, J. and <em>Doe, J.</em>. 2021. "Networks." <em>Social Networks</em> 12(3): 1-20.</li>
        <li>McLevey, J.. 2019. "Text." <em>Poetics</em>.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_appointments_rewrite_ranges() {
        let sections = build(
            "appointments:\n  - years: 2019--2024\n    job: Associate Professor\n    department: Knowledge Integration\n    faculty: Environment\n    employer: University of Waterloo\n    cross: Cross-appointed to Sociology\n",
        );
        let body = &section(&sections, "Academic Appointments").body;
        assert!(body.contains("<p>2019 to 2024 | <strong>Associate Professor</strong><br>"));
        assert!(body.contains("Knowledge Integration, Environment<br>"));
        assert!(body.contains("&nbsp;&nbsp;&nbsp;&nbsp;Cross-appointed to Sociology<br>"));
        assert!(body.ends_with("&nbsp;&nbsp;&nbsp;&nbsp;University of Waterloo</p>"));
    }

    #[test]
    fn test_leaves_are_a_subsection() {
        let sections = build("leaves:\n  - years: 2022--2023\n    type: Sabbatical\n    employer: Waterloo\n");
        let leaves = section(&sections, "Leaves");
        assert_eq!(leaves.level, 3);
        assert_eq!(
            leaves.body,
            "<p>2022 to 2023 | <strong>Sabbatical</strong><br>&nbsp;&nbsp;&nbsp;&nbsp;Waterloo</p>"
        );
    }

    #[test]
    fn test_affiliation_organization_splits_on_colon() {
        let sections = build(
            "affiliations:\n  - years: 2020--\n    role: Fellow\n    organization: 'Institute: Lab'\n",
        );
        assert_eq!(
            section(&sections, "Affiliations").body,
            "<p>2020 to  | <strong>Fellow</strong><br>&nbsp;&nbsp;&nbsp;&nbsp;Institute<br>&nbsp;&nbsp;&nbsp;&nbsp;Lab</p>"
        );
    }

    #[test]
    fn test_manuscripts_combine_articles_and_books() {
        let sections = build(
            "article-manuscripts:\n  - authors: A\n    title: Paper\n    status: Under Review\nbook-manuscripts:\n  - authors: B\n    title: Book\n",
        );
        assert_eq!(
            section(&sections, "Manuscripts in Progress").body,
            "<ol reversed>\n<li>A. \"Paper.\" Under Review.</li>\n<li>B. <em>Book</em>. In Progress.</li>\n</ol>"
        );
    }

    #[test]
    fn test_grants_optional_lines() {
        let sections = build(
            "grants:\n  - title: Big Grant\n    years: 2020--2025\n    pi: McLevey\n    grant: SSHRC Insight\n    amount: $100,000\n    ci: Doe\n",
        );
        assert_eq!(
            section(&sections, "Research Grants").body,
            "<ol reversed>\n<li><strong>Big Grant</strong> <br>2020 to 2025. PI: McLevey. SSHRC Insight. $100,000<br>CI: Doe.<br></li>\n</ol>"
        );
    }

    #[test]
    fn test_talks_sorted_newest_first_with_short_dates() {
        let sections = build(
            "conferences:\n  - authors: A\n    year: 2019-05-02\n    title: Old\n    conference: ASA\n    location: NYC\n  - authors: B\n    year: 2023-08-10\n    title: New\n    conference: Sunbelt\n    location: Portland\n",
        );
        assert_eq!(
            section(&sections, "Conference Presentations").body,
            "<ol reversed>\n<li>B. 2023-08. \"New.\" Sunbelt. Portland.</li>\n<li>A. 2019-05. \"Old.\" ASA. NYC.</li>\n</ol>"
        );
    }

    #[test]
    fn test_phd_role_depends_on_owner() {
        let sections = build(
            "phd:\n  - student: A\n    department: Sociology\n    supervisor: John McLevey\n    committee: X, Y\n    status: 2021\n  - student: B\n    department: KI\n    supervisor: Jane Roe\n    committee: Z\n    dissertation: Ties\n",
        );
        let body = &section(&sections, "PhD Supervision").body;
        assert!(body.contains("<li>A (2021). Sociology. Supervisor. Committee: X, Y.</li>"));
        assert!(body.contains(
            "<li>B. KI. Committee Member (Supervisor: Jane Roe). Committee: Z. Dissertation: \"Ties\".</li>"
        ));
    }

    #[test]
    fn test_peer_review_merges_sources() {
        let sections = build(
            "prarticles:\n  - journal: Poetics\n  - journal: Social Networks\nprbooks:\n  - year: 2020\n    book: Routledge\n",
        );
        assert_eq!(
            section(&sections, "Peer Review").body,
            "<ol reversed>\n<li>Journal Articles: Poetics, Social Networks.</li>\n<li>2020. Routledge.</li>\n</ol>"
        );
    }

    #[test]
    fn test_university_service_and_order() {
        let sections = build(
            "memberships: [ASA, INSNA]\nmcmaster:\n  - year: 2014--2015\n    role: Committee\nsuwaterloo:\n  - year: 2018\n    role: Chair\nareas: [Networks, Text]\n",
        );
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            vec![
                "Contact Information",
                "Research Areas",
                "University Service (Waterloo)",
                "University Service (McMaster)",
                "Professional Memberships",
            ]
        );
        assert_eq!(sections[1].body, "<p>Networks ⋅ Text</p>");
        assert_eq!(
            sections[3].body,
            "<ol reversed>\n<li>2014 to 2015. Committee.</li>\n</ol>"
        );
    }

    #[test]
    fn test_software_github_badge() {
        let data = data(
            "software:\n  - package: pdpp\n    description: Pipelines\n    license: MIT\n    development: Active\n    github: pdpp/pdpp\n  - package: other\n    description: Tool\n    license: GPL\n    development: Done\n    github: me/other\n",
        );
        let mut repos = HashMap::new();
        repos.insert(
            "pdpp/pdpp".to_string(),
            RepoInfo {
                full_name: "pdpp/pdpp".into(),
                html_url: "https://github.com/pdpp/pdpp".into(),
                description: None,
                stars: 42,
                forks: 3,
                language: None,
                pushed_at: None,
            },
        );
        let ctx = SectionContext {
            data: &data,
            owner: "John McLevey",
            repos: &repos,
            university_service: &[],
        };
        let body = software(&ctx).unwrap().body;
        assert!(body.contains(
            "<li><strong>pdpp</strong>. Pipelines. License: MIT. Development: Active. <a href=\"https://github.com/pdpp/pdpp\" class=\"gh-link\">GitHub</a> <span class=\"gh-stars\">(★ 42)</span></li>"
        ));
        assert!(body.contains(
            "Development: Done. <a href=\"https://github.com/me/other\" class=\"gh-link\">GitHub</a></li>"
        ));
    }

    fn body(yaml: &str, title: &str) -> String {
        section(&build(yaml), title).body.clone()
    }

    #[test]
    fn test_books_with_link() {
        let body = body(
            "books:\n  - authors: John McLevey\n    year: 2022\n    title: Doing Computational Social Science\n    press: Sage\n    city: London\n    ilink: https://example.com/dcss\n  - authors: Jane Roe\n    year: 2015\n    title: Ties\n    press: Routledge\n    city: New York\n",
            "Books",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>John McLevey. 2022. <em>Doing Computational Social Science</em>. Sage: London. <a href="https://example.com/dcss">[link]</a></li>
        <li>Jane Roe. 2015. <em>Ties</em>. Routledge: New York.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_chapters_open_access_link() {
        let body = body(
            "chapters:\n  - authors: John McLevey\n    year: 2020\n    title: Networks of Ideas\n    editors: A. Editor\n    book: Handbook of Networks\n    press: Oxford\n    city: Oxford\n    oa: https://example.com/oa.pdf\n",
            "Book Chapters",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>John McLevey. 2020. "Networks of Ideas." In A. Editor (Eds.), <em>Handbook of Networks</em>. Oxford: Oxford. <a href="https://example.com/oa.pdf">[open access]</a></li>
        </ol>
        "#);
    }

    #[test]
    fn test_special_issues() {
        let body = body(
            "issues:\n  - editors: John McLevey and Jane Roe\n    year: 2019\n    theme: Computational Sociology\n    journal: Canadian Review of Sociology\n",
            "Edited Special Issues",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>John McLevey and Jane Roe (Eds.). 2019. "Computational Sociology." <em>Canadian Review of Sociology</em>.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_reports_and_misc() {
        let sections = build(
            "reports:\n  - authors: John McLevey\n    year: 2018\n    report: Open Data in Ontario\n    client: Government of Ontario\nmisc:\n  - authors: John McLevey\n    year: 2017\n    title: A Blog Post\n    details: Published online.\n",
        );
        insta::assert_snapshot!(section(&sections, "Research Reports").body, @r#"
        <ol reversed>
        <li>John McLevey. 2018. "Open Data in Ontario." Government of Ontario.</li>
        </ol>
        "#);
        insta::assert_snapshot!(section(&sections, "Other Publications").body, @r#"
        <ol reversed>
        <li>John McLevey. 2017. "A Blog Post." Published online.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_teaching_grants_and_contracts() {
        let sections = build(
            "teachinggrants:\n  - years: 2016--2017\n    title: Active Learning\n    grant: LITE Seed Grant\n    amount: $5,000\ncontracts:\n  - years: 2019--2020\n    title: Survey Design\n    organization: City of Waterloo\n",
        );
        insta::assert_snapshot!(section(&sections, "Teaching Grants").body, @r#"
        <ol reversed>
        <li>2016 to 2017. "Active Learning." LITE Seed Grant. $5,000.</li>
        </ol>
        "#);
        insta::assert_snapshot!(section(&sections, "Research Contracts").body, @r#"
        <ol reversed>
        <li>2019 to 2020. "Survey Design." City of Waterloo.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_awards_rewrite_ranges_in_whole_item() {
        let body = body(
            "awards:\n  - year: 2010--2014\n    award: Early Career Award--Honourable Mention\n    organization: SSHRC\n    amount: $80,000\n  - year: 2009\n    award: Best Paper\n    organization: CSA\n",
            "Awards and Scholarships",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>2010 to 2014. Early Career Award to Honourable Mention. SSHRC ($80,000).</li>
        <li>2009. Best Paper. CSA.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_other_software_falls_back_to_plain_link() {
        let body = body(
            "othersoftware:\n  - package: networkx\n    description: Contributed documentation\n    github: networkx/networkx\n",
            "Software Contributions",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li><strong>networkx</strong>. Contributed documentation. <a href="https://github.com/networkx/networkx" class="gh-link">GitHub</a></li>
        </ol>
        "#);
    }

    #[test]
    fn test_invited_talks_sorted_by_year() {
        let body = body(
            "invited:\n  - authors: John McLevey\n    year: 2021-03-15\n    title: Text as Data\n    conference: McGill Sociology\n    location: Montreal\n  - authors: John McLevey\n    year: 2022\n    title: Networks\n    conference: UBC\n    location: Vancouver\n",
            "Invited Talks",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>John McLevey. 2022. "Networks." UBC. Vancouver.</li>
        <li>John McLevey. 2021-03. "Text as Data." McGill Sociology. Montreal.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_courses_and_reading() {
        let sections = build(
            "courses:\n  - year: 2023\n    id: SOC 101\n    name: Introduction to Sociology\n    level: Undergraduate\nreading:\n  - year: 2022\n    name: Network Analysis\n    level: Graduate\n    who: '*A. Student*'\n  - year: 2021\n    name: Text Mining\n    level: Undergraduate\n",
        );
        insta::assert_snapshot!(section(&sections, "Courses Taught").body, @r"
        <ol reversed>
        <li>2023. SOC 101: Introduction to Sociology (Undergraduate).</li>
        </ol>
        ");
        insta::assert_snapshot!(section(&sections, "Directed Reading Courses").body, @r"
        <ol reversed>
        <li>2022. Network Analysis (Graduate) (<em>A. Student</em>).</li>
        <li>2021. Text Mining (Undergraduate).</li>
        </ol>
        ");
    }

    #[test]
    fn test_masters_optional_thesis() {
        let body = body(
            "masters:\n  - student: Sam Lee\n    status: 2020\n    degree: MA\n    department: Sociology\n    role: Supervisor\n    thesis: Ties That Bind\n  - student: Ana Ruiz\n    status: In Progress\n    degree: MES\n    department: Environment\n    role: Committee Member\n",
            "Masters Supervision",
        );
        insta::assert_snapshot!(body, @r#"
        <ol reversed>
        <li>Sam Lee (2020). MA, Sociology. Supervisor. "Ties That Bind".</li>
        <li>Ana Ruiz (In Progress). MES, Environment. Committee Member.</li>
        </ol>
        "#);
    }

    #[test]
    fn test_hqp_lists_graduate_and_undergraduate_assistants() {
        let body = body(
            "hqp:\n  - year: 2023\n    gra: Sam Lee, Ana Ruiz\n    ura: Kim Park\n  - year: 2022\n    ura: Lee Wong\n",
            "Research Assistants (HQP)",
        );
        insta::assert_snapshot!(body, @r"
        <ol reversed>
        <li>2023. Graduate RAs: Sam Lee, Ana Ruiz. Undergraduate RAs: Kim Park.</li>
        <li>2022. Undergraduate RAs: Lee Wong.</li>
        </ol>
        ");
    }

    #[test]
    fn test_student_training_sections() {
        let sections = build(
            "othergrad:\n  - year: 2021\n    training: Network Analysis Workshop\nundergraduate:\n  - year: 2020\n    student: Kim Park\n    department: Sociology\n    thesis: Online Communities\n",
        );
        insta::assert_snapshot!(section(&sections, "Graduate Training and Workshops").body, @r"
        <ol reversed>
        <li>2021. Network Analysis Workshop.</li>
        </ol>
        ");
        insta::assert_snapshot!(section(&sections, "Undergraduate Thesis Supervision").body, @r#"
        <ol reversed>
        <li>2020. Kim Park. Sociology. "Online Communities".</li>
        </ol>
        "#);
    }

    #[test]
    fn test_sessions_optional_panelists() {
        let body = body(
            "sessions:\n  - year: 2019\n    session: Computational Sociology\n    panelists: A, B, C\n  - year: 2018\n    session: Text as Data\n",
            "Conference Sessions Organized",
        );
        insta::assert_snapshot!(body, @r"
        <ol reversed>
        <li>2019. Computational Sociology. Panelists: A, B, C.</li>
        <li>2018. Text as Data.</li>
        </ol>
        ");
    }

    #[test]
    fn test_training_and_rata() {
        let sections = build(
            "training:\n  - year: 2015\n    training: Teaching Certificate\nrata:\n  - year: 2010\n    position: Teaching Assistant, SOC 200\n",
        );
        insta::assert_snapshot!(section(&sections, "Professional Development").body, @r"
        <ol reversed>
        <li>2015. Teaching Certificate.</li>
        </ol>
        ");
        insta::assert_snapshot!(section(&sections, "Research and Teaching Assistantships").body, @r"
        <ol reversed>
        <li>2010. Teaching Assistant, SOC 200.</li>
        </ol>
        ");
    }

    #[test]
    fn test_github_badge_trims_and_skips_invalid_repos() {
        let data = data(
            "othersoftware:\n  - package: padded\n    description: Spaces\n    github: ' me/padded '\n  - package: bad\n    description: Broken\n    github: not a repo\n",
        );
        let mut repos = HashMap::new();
        repos.insert(
            "me/padded".to_string(),
            RepoInfo {
                full_name: "me/padded".into(),
                html_url: "https://github.com/me/padded".into(),
                description: None,
                stars: 7,
                forks: 0,
                language: None,
                pushed_at: None,
            },
        );
        let ctx = SectionContext {
            data: &data,
            owner: "John McLevey",
            repos: &repos,
            university_service: &[],
        };
        insta::assert_snapshot!(other_software(&ctx).unwrap().body, @r#"
        <ol reversed>
        <li><strong>padded</strong>. Spaces. <a href="https://github.com/me/padded" class="gh-link">GitHub</a> <span class="gh-stars">(★ 7)</span></li>
        <li><strong>bad</strong>. Broken.</li>
        </ol>
        "#);
    }
}
