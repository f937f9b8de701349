fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

fn normalize(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .replace(['-', ' ', '.'], "_")
}

fn score(input: &str, candidate: &str) -> Option<usize> {
    if input == candidate {
        return Some(0);
    }
    if candidate.contains(input) || input.contains(candidate) {
        return Some(1);
    }
    let budget = (input.chars().count() / 3).max(2);
    let distance = edit_distance(input, candidate);
    if distance <= budget {
        return Some(distance);
    }
    // "instances_list" and "list_instances" share every token.
    let mut left: Vec<&str> = input.split('_').filter(|t| !t.is_empty()).collect();
    let mut right: Vec<&str> = candidate.split('_').filter(|t| !t.is_empty()).collect();
    left.sort_unstable();
    right.sort_unstable();
    if !left.is_empty() && left == right {
        return Some(budget);
    }
    None
}

/// Closest tool names to `input`, best first.
pub fn suggest<'a, I>(input: &str, candidates: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let needle = normalize(input);
    if needle.is_empty() {
        return Vec::new();
    }
    let mut scored: Vec<(usize, &str)> = candidates
        .into_iter()
        .filter_map(|candidate| score(&needle, candidate).map(|s| (s, candidate)))
        .collect();
    scored.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)));
    scored.dedup_by(|a, b| a.1 == b.1);
    scored
        .into_iter()
        .take(limit.max(1))
        .map(|(_, name)| name.to_string())
        .collect()
}
