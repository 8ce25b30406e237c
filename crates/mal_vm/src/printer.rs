use std::fmt;

use crate::types::MalValue;

impl MalValue {
    pub fn pr_str(&self, print_readably: bool) -> String {
        match self {
            MalValue::Nil => "nil".to_string(),
            MalValue::Bool(flag) => flag.to_string(),
            MalValue::Integer(integer) => integer.to_string(),
            MalValue::Str(string) if print_readably => escape(string),
            MalValue::Str(string) => string.clone(),
            MalValue::Symbol(name) => name.clone(),
            MalValue::List(seq) => pr_seq(seq.iter(), print_readably, "(", ")"),
            MalValue::Vector(seq) => pr_seq(seq.iter(), print_readably, "[", "]"),
            MalValue::Map(map) => {
                let keys: Vec<MalValue> = map.keys().cloned().map(MalValue::Str).collect();
                let pairs = keys.iter().zip(map.values()).flat_map(|(k, v)| [k, v]);
                pr_seq(pairs, print_readably, "{", "}")
            }
            MalValue::Builtin(builtin) => format!("{builtin:?}"),
            MalValue::Closure(closure) => format!("{closure:?}"),
        }
    }
}

impl fmt::Display for MalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pr_str(true))
    }
}

fn pr_seq<'a>(
    seq: impl Iterator<Item = &'a MalValue>,
    print_readably: bool,
    start: &str,
    end: &str,
) -> String {
    let items: Vec<String> = seq.map(|value| value.pr_str(print_readably)).collect();
    format!("{start}{}{end}", items.join(" "))
}

fn escape(string: &str) -> String {
    let mut out = String::with_capacity(string.len() + 2);
    out.push('"');
    for ch in string.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\\' => out.push_str("\\\\"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
