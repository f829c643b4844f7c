//! Scheduled task name to dropdown option matching.
//!
//! The portal's task dropdown changes per crop and per season, and the
//! schedule data uses its own wording. [`match_task`] bridges the two with a
//! fixed sequence of rules; the first rule that produces an option wins.

/// Which rule produced a match.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchRule {
    Exact,
    Substring,
    Keyword { category: &'static str },
    Similarity { score: f64 },
    Fallback,
}

/// The option chosen for a candidate task name.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskMatch {
    pub label: String,
    pub index: usize,
    pub rule: MatchRule,
}

/// A task family: words that identify it in a schedule entry and words that
/// identify it in a dropdown option.
struct Category {
    name: &'static str,
    triggers: &'static [&'static str],
    related: &'static [&'static str],
}

const CATEGORIES: &[Category] = &[
    Category {
        name: "plowing",
        triggers: &["논갈이", "쟁기", "갈이", "경운"],
        related: &["논갈이", "쟁기", "갈이", "경운"],
    },
    Category {
        name: "rotary",
        triggers: &["로터리"],
        related: &["로터리", "경운"],
    },
    Category {
        name: "seed-disinfection",
        triggers: &["볍씨소독", "소독", "볍씨"],
        related: &["소독", "볍씨"],
    },
    Category {
        name: "seeding",
        triggers: &["씨뿌리기", "파종", "종자", "씨앗"],
        related: &["파종", "씨뿌리기", "종자"],
    },
    Category {
        name: "seedbed",
        triggers: &["치상"],
        related: &["치상"],
    },
    Category {
        name: "transplanting",
        triggers: &["모내기", "이앙", "정식", "심기"],
        related: &["이앙", "모내기", "정식"],
    },
    Category {
        name: "fertilizing",
        triggers: &["비료", "시비", "영양"],
        related: &["비료", "시비"],
    },
    Category {
        name: "pest-control",
        triggers: &["방제", "농약", "살포", "약제", "병해충"],
        related: &["방제", "농약", "약제"],
    },
    Category {
        name: "weeding",
        triggers: &["제초", "잡초"],
        related: &["제초", "잡초"],
    },
    Category {
        name: "water-management",
        triggers: &["물떼기", "물관리", "관수", "배수"],
        related: &["물떼기", "물관리", "관수", "배수"],
    },
    Category {
        name: "harvest",
        triggers: &["수확", "수집"],
        related: &["수확"],
    },
    Category {
        name: "drying",
        triggers: &["건조"],
        related: &["건조"],
    },
    Category {
        name: "shipping",
        triggers: &["출하", "판매"],
        related: &["출하", "판매"],
    },
    Category {
        name: "other",
        triggers: &["기타", "교육", "예찰", "관찰", "활동"],
        related: &["기타", "교육", "예찰", "관찰"],
    },
];

/// Minimum similarity score a candidate must beat.
const SIMILARITY_THRESHOLD: f64 = 0.3;

/// Pick the option that best represents `candidate`.
///
/// Rules in order: exact label, substring either way, keyword category,
/// character overlap above 0.3, then the first option. Returns `None` only
/// when `options` is empty. Duplicate labels resolve to the first one.
pub fn match_task<S: AsRef<str>>(candidate: &str, options: &[S]) -> Option<TaskMatch> {
    if options.is_empty() {
        return None;
    }

    let labels: Vec<&str> = options.iter().map(AsRef::as_ref).collect();
    let found = |index: usize, rule: MatchRule| TaskMatch {
        label: labels[index].to_string(),
        index,
        rule,
    };

    if let Some(index) = labels.iter().position(|label| *label == candidate) {
        return Some(found(index, MatchRule::Exact));
    }

    if let Some(index) = labels
        .iter()
        .position(|label| label.contains(candidate) || candidate.contains(label))
    {
        return Some(found(index, MatchRule::Substring));
    }

    if let Some((index, category)) = keyword_match(candidate, &labels) {
        return Some(found(index, MatchRule::Keyword { category }));
    }

    let mut best: Option<(usize, f64)> = None;
    for (index, label) in labels.iter().enumerate() {
        let score = similarity(candidate, label);
        let best_score = best.map_or(0.0, |(_, s)| s);
        if score > best_score && score > SIMILARITY_THRESHOLD {
            best = Some((index, score));
        }
    }
    if let Some((index, score)) = best {
        return Some(found(index, MatchRule::Similarity { score }));
    }

    Some(found(0, MatchRule::Fallback))
}

fn keyword_match(candidate: &str, labels: &[&str]) -> Option<(usize, &'static str)> {
    CATEGORIES
        .iter()
        .filter(|category| category.triggers.iter().any(|t| candidate.contains(t)))
        .find_map(|category| {
            labels
                .iter()
                .position(|label| category.related.iter().any(|term| label.contains(term)))
                .map(|index| (index, category.name))
        })
}

/// Characters of `candidate` (counted with repetition) that occur anywhere in
/// `option`, divided by the longer of the two lengths.
pub(crate) fn similarity(candidate: &str, option: &str) -> f64 {
    let candidate_len = candidate.chars().count();
    let option_len = option.chars().count();
    let longest = candidate_len.max(option_len);
    if longest == 0 {
        return 0.0;
    }

    let shared = candidate.chars().filter(|c| option.contains(*c)).count();
    shared as f64 / longest as f64
}

#[cfg(test)]
#[path = "matcher_tests.rs"]
mod tests;
