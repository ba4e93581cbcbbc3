use std::borrow::Cow;

/// Case-insensitive `true` / `false`
pub fn try_parse_bool(arg: &str) -> Option<bool> {
    if arg.eq_ignore_ascii_case("true") {
        Some(true)
    } else if arg.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/**
Remove thousands-style `,` separators from the integer part of a float, as in
`1,234,567.5`. The first group has one to three digits and every later group
has exactly three. Returns `None` if separators are present but misplaced;
the text is otherwise left for the float parser to judge.
*/
pub fn strip_float_grouping(arg: &str) -> Option<Cow<'_, str>> {
    if !arg.contains(',') {
        return Some(Cow::Borrowed(arg));
    }

    let (sign, body) = match arg.strip_prefix(['-', '+']) {
        Some(body) => (&arg[..1], body),
        None => ("", arg),
    };

    let split = body
        .find(|c: char| !(c.is_ascii_digit() || c == ','))
        .unwrap_or(body.len());

    let (integer, tail) = body.split_at(split);

    if tail.contains(',') {
        return None;
    }

    let mut groups = integer.split(',');
    let first = groups.next()?;

    if first.is_empty() || first.len() > 3 {
        return None;
    }

    let mut stripped = String::with_capacity(arg.len());
    stripped.push_str(sign);
    stripped.push_str(first);

    for group in groups {
        if group.len() != 3 {
            return None;
        }

        stripped.push_str(group);
    }

    stripped.push_str(tail);
    Some(Cow::Owned(stripped))
}
