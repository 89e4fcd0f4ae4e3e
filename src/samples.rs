//! Built-in sample articles.
//!
//! Handy for trying the analyzer without hunting for text to paste.

use crate::models::Prediction;

/// A canned article with the label a careful reader would give it.
#[derive(Debug, Clone, Copy)]
pub struct SampleArticle {
    pub title: &'static str,
    pub expected: Prediction,
    pub source: &'static str,
    pub content: &'static str,
}

pub static SAMPLES: [SampleArticle; 3] = [
    SampleArticle {
        title: "Authentic News Example",
        expected: Prediction::Authentic,
        source: "MIT Technology Review",
        content: "Scientists at MIT have developed a new breakthrough in renewable energy storage \
technology. The research, published in Nature Energy journal, demonstrates a novel battery design \
that could increase energy density by 40% while reducing costs. The study was peer-reviewed and \
involved collaboration with researchers from three other universities over a two-year period.",
    },
    SampleArticle {
        title: "Suspicious Content Example",
        expected: Prediction::Fake,
        source: "Unknown Source",
        content: "BREAKING: Local doctors HATE this one simple trick that cures all diseases! \
A miracle cure discovered by a housewife in Nebraska is being SUPPRESSED by Big Pharma! Click \
here to learn the secret they don't want you to know. This remedy works 100% of the time and \
doctors are FURIOUS!",
    },
    SampleArticle {
        title: "Balanced Reporting Example",
        expected: Prediction::Authentic,
        source: "Reuters",
        content: "The Federal Reserve announced a 0.25% interest rate adjustment following their \
monthly meeting. The decision, which affects lending rates nationwide, was made in response to \
current inflation data showing a 2.1% year-over-year increase. Financial analysts from major \
banks provided mixed reactions, with some citing concerns about economic growth while others \
praised the measured approach.",
    },
];

/// Look up a sample by its 1-based number.
pub fn get(number: usize) -> Option<&'static SampleArticle> {
    number.checked_sub(1).and_then(|i| SAMPLES.get(i))
}
