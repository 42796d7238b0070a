/// Platform knowledge summary injected into the assistant's system prompt.
///
/// The summary is rebuilt from the live catalog on every chat request and is never
/// cached. `summarize` is total: empty inputs produce descriptive placeholders rather
/// than errors, so a chat request never fails because the catalog is empty.
use tracing::{info, warn};

use crate::catalog::{CatalogSource, Category, Course};

const TOP_COURSES_LIMIT: usize = 8;
const SAMPLE_NAMES_LIMIT: usize = 20;
const CURRENCY: &str = "₹";

const NO_CATEGORIES: &str = "No categories yet.";
const NO_COURSES: &str = "No published courses yet.";
const NO_ENROLLMENTS: &str = "No enrollment data yet.";
const UNAVAILABLE: &str = "Unable to load.";

/// Point-in-time textual summary of the course catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct KnowledgeSnapshot {
    /// Category names joined with ", ", in query order.
    pub category_list: String,
    /// "₹<low> to ₹<high>", or a placeholder when no course carries a usable price.
    pub price_range: String,
    pub lowest_price: Option<f64>,
    pub highest_price: Option<f64>,
    /// Up to eight "<name> (<n> enrolled, ₹<price>)" entries joined with "; ".
    pub top_courses: String,
    /// Up to twenty course names joined with ", ".
    pub course_names: String,
    pub total_courses: usize,
    pub total_categories: usize,
}

impl KnowledgeSnapshot {
    /// Snapshot used when the catalog could not be read at all.
    pub fn unavailable() -> Self {
        Self {
            category_list: UNAVAILABLE.to_string(),
            price_range: UNAVAILABLE.to_string(),
            lowest_price: None,
            highest_price: None,
            top_courses: UNAVAILABLE.to_string(),
            course_names: UNAVAILABLE.to_string(),
            total_courses: 0,
            total_categories: 0,
        }
    }

    pub fn lowest_price_label(&self) -> Option<String> {
        self.lowest_price.map(format_price)
    }

    pub fn highest_price_label(&self) -> Option<String> {
        self.highest_price.map(format_price)
    }
}

/// Query the catalog (both reads run concurrently) and summarize the result.
///
/// A failed read never aborts the chat request: the error is logged and the
/// "Unable to load." snapshot is returned instead.
pub async fn load_snapshot(catalog: &dyn CatalogSource) -> KnowledgeSnapshot {
    match tokio::try_join!(catalog.categories(), catalog.published_courses()) {
        Ok((categories, courses)) => {
            let snapshot = summarize(&categories, &courses);
            info!(
                categories = snapshot.total_categories,
                courses = snapshot.total_courses,
                "knowledge snapshot built"
            );
            snapshot
        }
        Err(e) => {
            warn!(error = %e, "knowledge snapshot build failed, using placeholders");
            KnowledgeSnapshot::unavailable()
        }
    }
}

/// Build a snapshot from already-materialized catalog rows.
pub fn summarize(categories: &[Category], courses: &[Course]) -> KnowledgeSnapshot {
    let category_names: Vec<&str> = categories
        .iter()
        .filter_map(|c| non_empty(c.name.as_deref()))
        .collect();
    let category_list = if category_names.is_empty() {
        NO_CATEGORIES.to_string()
    } else {
        category_names.join(", ")
    };

    let (lowest_price, highest_price) = price_bounds(courses);
    let price_range = match (lowest_price, highest_price) {
        (Some(low), Some(high)) => format!("{} to {}", format_price(low), format_price(high)),
        _ => NO_COURSES.to_string(),
    };

    let top_courses = top_enrolled(courses);

    let course_names = if courses.is_empty() {
        NO_COURSES.to_string()
    } else {
        courses
            .iter()
            .take(SAMPLE_NAMES_LIMIT)
            .filter_map(|c| non_empty(c.name.as_deref()))
            .collect::<Vec<_>>()
            .join(", ")
    };
    // The first twenty rows can all be unnamed even when courses exist.
    let course_names = if course_names.is_empty() {
        NO_COURSES.to_string()
    } else {
        course_names
    };

    KnowledgeSnapshot {
        category_list,
        price_range,
        lowest_price,
        highest_price,
        top_courses,
        course_names,
        total_courses: courses.len(),
        total_categories: categories.len(),
    }
}

fn price_bounds(courses: &[Course]) -> (Option<f64>, Option<f64>) {
    courses
        .iter()
        .filter_map(|c| c.price)
        .filter(|p| p.is_finite() && *p >= 0.0)
        .fold((None, None), |(low, high): (Option<f64>, Option<f64>), p| {
            (
                Some(low.map_or(p, |l| l.min(p))),
                Some(high.map_or(p, |h| h.max(p))),
            )
        })
}

fn top_enrolled(courses: &[Course]) -> String {
    let mut ranked: Vec<(&str, i64, Option<f64>)> = courses
        .iter()
        .filter_map(|c| {
            let name = non_empty(c.name.as_deref())?;
            Some((name, c.enrollment_count.unwrap_or(0).max(0), c.price))
        })
        .collect();

    // `sort_by` is stable, so equal counts keep catalog order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let rendered = ranked
        .into_iter()
        .take(TOP_COURSES_LIMIT)
        .map(|(name, count, price)| {
            let price = price.map_or_else(|| format!("{CURRENCY}N/A"), format_price);
            format!("{name} ({count} enrolled, {price})")
        })
        .collect::<Vec<_>>()
        .join("; ");

    if rendered.is_empty() {
        NO_ENROLLMENTS.to_string()
    } else {
        rendered
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

/// Format an amount with the currency prefix, shortest form ("₹499", "₹499.5").
pub fn format_price(amount: f64) -> String {
    // Avoid printing "-0" for a negative zero.
    let amount = if amount == 0.0 { 0.0 } else { amount };
    format!("{CURRENCY}{amount}")
}

/// Render the assistant's system prompt around a knowledge snapshot.
pub fn system_prompt(knowledge: &KnowledgeSnapshot) -> String {
    let lowest = knowledge
        .lowest_price_label()
        .unwrap_or_else(|| "N/A".to_string());
    let highest = knowledge
        .highest_price_label()
        .unwrap_or_else(|| "N/A".to_string());

    format!(
        "You are the friendly StudyNotion assistant. StudyNotion is an online learning platform (ed-tech) \
that helps users learn coding and technical skills through structured courses. You help visitors and \
students with course discovery, pricing, categories, and how to use the platform.

## What StudyNotion solves
- Makes quality coding education accessible online: learn at your own pace, from anywhere.
- Connects students with instructor-led courses, hands-on projects, and feedback.
- Offers a clear path from beginner to advanced with categorized courses and a simple UI.

## Platform knowledge (use this to answer accurately)
- **Course categories:** {categories}
- **Price range:** {price_range}
- **Lowest course price:** {lowest}
- **Highest course price:** {highest}
- **Popular / best-enrolled courses:** {top_courses}
- **Sample course names:** {course_names}
- **Total published courses:** {total_courses}
- **Total categories:** {total_categories}

## UI and navigation guide
- **Home:** Landing page with highlights, CTA to sign up, and course overview.
- **Catalog:** Browse courses by category; each category shows its courses.
- **About Us:** Company story and mission (driving innovation in online education).
- **Contact Us:** Page to reach support or send inquiries.
- **Sign up / Login:** Top-right; users can register as Student or Instructor.
- **Dashboard (after login):** Students see profile, enrolled courses, cart; Instructors see dashboard, \
my courses, add/edit course.
- **Course details:** Each course has description, price, instructor, what you'll learn; students can \
enroll or add to cart.
- No login is required to browse the catalog or use this chat.

Answer in a helpful, concise way. If asked about courses, categories, or prices, use the platform \
knowledge above. If something is not in the knowledge, say you don't have that information and suggest \
they check the Catalog or Contact Us. Keep replies focused and friendly.",
        categories = knowledge.category_list,
        price_range = knowledge.price_range,
        top_courses = knowledge.top_courses,
        course_names = knowledge.course_names,
        total_courses = knowledge.total_courses,
        total_categories = knowledge.total_categories,
    )
}
