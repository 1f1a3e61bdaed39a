use super::{Outcome, Resolution, TermKey};
use crate::common::{Int, UInt};

/// Renders an [`Outcome`] for people: the value, then one line per term in
/// evaluation order.
pub trait Stringify {
    fn stringify(&mut self, outcome: &Outcome) -> String {
        let mut ret = self.str_value(outcome.value);
        for (key, term) in outcome.metadata.iter() {
            ret.push('\n');
            ret.push_str(&self.str_term(key, term));
        }
        ret
    }

    fn str_value(&mut self, value: Int) -> String;

    fn str_term(&mut self, key: &TermKey, term: &Resolution) -> String;
}

#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for SimpleStringifier {
    fn str_value(&mut self, value: Int) -> String {
        value.to_string()
    }

    fn str_term(&mut self, key: &TermKey, term: &Resolution) -> String {
        if term.is_dice() {
            let rolls = if term.raw_rolls == term.final_rolls {
                fmt_list(&term.raw_rolls)
            } else {
                format!("{} -> {}", fmt_list(&term.raw_rolls), fmt_list(&term.final_rolls))
            };
            format!("{}: {} = {}", key, rolls, term.value)
        } else {
            let tags: String = term.tags.iter().map(|tag| format!("[{}]", tag)).collect();
            format!("{}{} = {}", key, tags, term.value)
        }
    }
}

/// Like [`SimpleStringifier`], but dice that were kept out are struck through.
/// The final rolls are only listed when a clamp changed them.
#[derive(Default)]
pub struct MarkdownStringifier;

impl MarkdownStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for MarkdownStringifier {
    fn str_value(&mut self, value: Int) -> String {
        format!("**{}**", value)
    }

    fn str_term(&mut self, key: &TermKey, term: &Resolution) -> String {
        if term.is_dice() {
            let struck: Vec<_> = term
                .raw_rolls
                .iter()
                .enumerate()
                .map(|(i, x)| {
                    if term.dropped.contains(&i) {
                        format!("~~{}~~", x)
                    } else {
                        x.to_string()
                    }
                })
                .collect();
            let mut rolls = format!("[{}]", struck.join(", "));
            if !term.only_dropped() {
                rolls = format!("{} -> {}", rolls, fmt_list(&term.final_rolls));
            }
            format!("- `{}`: {} = **{}**", key, rolls, term.value)
        } else {
            let tags: String = term.tags.iter().map(|tag| format!(" [{}]", tag)).collect();
            format!("- `{}`{} = **{}**", key, tags, term.value)
        }
    }
}

fn fmt_list(rolls: &[UInt]) -> String {
    let rolls: Vec<_> = rolls.iter().map(ToString::to_string).collect();
    format!("[{}]", rolls.join(", "))
}
