//! Keyword tables the detectors match against.
//!
//! All entries are lowercase; candidate text is normalized before matching.

/// Guilt-tripping phrases aimed at users trying to leave or decline.
pub const GUILT: &[&str] = &[
    "regret",
    "miss out",
    "missing out",
    "fear of missing",
    "you'll be sorry",
    "you will be sorry",
    "don't leave",
    "dont leave",
    "wait, don't go",
    "wait dont go",
    "are you sure",
    "really want to leave",
    "really want to miss",
    "before you go",
];

/// Self-deprecating opt-out statements ("I hate saving money").
pub const SELF_DEPRECATING: &[&str] = &[
    "pay full price",
    "hate saving",
    "hate savings",
    "hate discounts",
    "hate deals",
    "hate money",
    "i don't like saving",
    "i dont like saving",
    "i don't like discounts",
    "i dont like discounts",
    "i don't like deals",
    "i dont like deals",
];

/// Phrases commonly used on opt-out call-to-action controls.
pub const OPT_OUT: &[&str] = &[
    "no thanks",
    "no, thanks",
    "no thank you",
    "no, thank you",
    "no i'm good",
    "no im good",
    "no i am good",
    "i'll pass",
    "ill pass",
];

pub fn confirm_shaming_all() -> Vec<&'static str> {
    [GUILT, SELF_DEPRECATING, OPT_OUT].concat()
}

/// Consent-related wording around pre-checked boxes.
pub const CONSENT: &[&str] = &[
    "deal",
    "newsletter",
    "newsletters",
    "marketing",
    "offers",
    "promotions",
    "promo",
    "sale alerts",
    "updates",
    "product updates",
    "third party",
    "third-party",
    "partners",
    "share my data",
    "share our data",
    "personalized ads",
];

/// Explicit confusion phrasing in labels.
pub const CONFUSION: &[&str] = &[
    "uncheck if",
    "un-check if",
    "un check if",
    "check if you don't want",
    "check if you dont want",
    "check if you do not want",
    "do not uncheck",
    "don't uncheck",
    "dont uncheck",
    "opt out",
    "opt-out",
    "optout",
];

/// Words placing a label in a consent context.
pub const CONSENT_CONTEXT: &[&str] = &[
    "email",
    "emails",
    "newsletter",
    "newsletters",
    "offers",
    "promotions",
    "marketing",
    "ads",
    "advertising",
    "news and updates",
    "updates",
];

pub const NEGATION: &[&str] = &["don't", "dont", "not", "no", "never"];

pub const ACTION: &[&str] = &["unsubscribe", "subscribe", "send", "emails", "email", "marketing"];

pub fn trick_question_all() -> Vec<&'static str> {
    [CONFUSION, CONSENT_CONTEXT, NEGATION, ACTION].concat()
}

/// Urgency and scarcity wording around countdowns.
pub const URGENCY: &[&str] = &[
    "for free",
    "save more",
    "savings",
    "lowest price",
    "cheapest",
    "deal ends in",
    "ends",
    "deal",
    "offer ends in",
    "offer expires in",
    "expires in",
    "ends in",
    "limited time",
    "time left",
    "only a few left",
    "left",
    "limited stock",
    "limited quantity",
    "hurry",
    "act now",
    "last chance",
    "ending soon",
    "today only",
    "sale ends in",
];

/// Sponsorship disclosure wording, including the common misspelling.
pub const SPONSOR: &[&str] = &[
    "sponsored",
    "sponsered",
    "promoted",
    "promotion",
    "promoted post",
    "ad",
    "advertisement",
    "paid partnership",
    "paid post",
    "partner content",
    "brand content",
];
