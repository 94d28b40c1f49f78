use std::collections::BTreeMap;

/// All combinations of `items` of sizes `1..=max_len`, preserving order.
pub fn combination_list<T: Clone>(items: &[T], max_len: Option<usize>) -> Vec<Vec<T>> {
    let cap = max_len.unwrap_or(items.len()).min(items.len());
    let mut out = Vec::new();
    let mut current = Vec::new();
    for len in 1..=cap {
        combine_into(items, len, 0, &mut current, &mut out);
    }
    out
}

fn combine_into<T: Clone>(
    items: &[T],
    len: usize,
    start: usize,
    current: &mut Vec<T>,
    out: &mut Vec<Vec<T>>,
) {
    if current.len() == len {
        out.push(current.clone());
        return;
    }
    for i in start..items.len() {
        current.push(items[i].clone());
        combine_into(items, len, i + 1, current, out);
        current.pop();
    }
}

/// Lazy cartesian product with repetition (odometer iteration).
/// `repeat == 0` yields exactly one empty selection.
pub struct Product<T: Clone> {
    items: Vec<T>,
    repeat: usize,
    indices: Vec<usize>,
    done: bool,
}

pub fn product_list<T: Clone>(items: &[T], repeat: usize) -> Product<T> {
    Product {
        done: repeat > 0 && items.is_empty(),
        items: items.to_vec(),
        repeat,
        indices: vec![0; repeat],
    }
}

impl<T: Clone> Iterator for Product<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let combo: Vec<T> = self.indices.iter().map(|&i| self.items[i].clone()).collect();

        // 最右側的位數先進位
        let mut pos = self.repeat;
        loop {
            if pos == 0 {
                self.done = true;
                break;
            }
            pos -= 1;
            self.indices[pos] += 1;
            if self.indices[pos] < self.items.len() {
                break;
            }
            self.indices[pos] = 0;
        }

        Some(combo)
    }
}

/// Zips field names onto every selection, truncating to the shorter side.
pub fn map_field_inputs<I>(
    fields: Vec<String>,
    combos: I,
) -> impl Iterator<Item = BTreeMap<String, String>>
where
    I: IntoIterator<Item = Vec<String>>,
{
    combos
        .into_iter()
        .map(move |combo| fields.iter().cloned().zip(combo).collect())
}

/// Drops names equal to or containing any exclusion token.
pub fn exclude_names(names: Vec<String>, exclude: Option<&[String]>) -> Vec<String> {
    match exclude {
        None => names,
        Some(tokens) => names
            .into_iter()
            .filter(|name| !tokens.iter().any(|tok| name.contains(tok.as_str())))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_combination_list_sizes() {
        let combos = combination_list(&strings(&["a", "b", "c"]), None);
        // C(3,1) + C(3,2) + C(3,3) = 3 + 3 + 1
        assert_eq!(combos.len(), 7);
        assert_eq!(combos[0], strings(&["a"]));
        assert_eq!(combos[6], strings(&["a", "b", "c"]));
    }

    #[test]
    fn test_combination_list_capped() {
        let combos = combination_list(&strings(&["a", "b", "c"]), Some(1));
        assert_eq!(combos, vec![strings(&["a"]), strings(&["b"]), strings(&["c"])]);
    }

    #[test]
    fn test_combination_list_cap_larger_than_items() {
        let combos = combination_list(&strings(&["a"]), Some(5));
        assert_eq!(combos, vec![strings(&["a"])]);
    }

    #[test]
    fn test_product_list_order() {
        let combos: Vec<_> = product_list(&strings(&["x", "y"]), 2).collect();
        assert_eq!(
            combos,
            vec![
                strings(&["x", "x"]),
                strings(&["x", "y"]),
                strings(&["y", "x"]),
                strings(&["y", "y"]),
            ]
        );
    }

    #[test]
    fn test_product_list_zero_repeat_yields_one_empty() {
        let combos: Vec<_> = product_list(&strings(&["x", "y"]), 0).collect();
        assert_eq!(combos, vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_product_list_empty_items() {
        let combos: Vec<_> = product_list(&Vec::<String>::new(), 2).collect();
        assert!(combos.is_empty());
    }

    #[test]
    fn test_map_field_inputs_truncates() {
        let mapped: Vec<_> = map_field_inputs(
            strings(&["name", "label"]),
            vec![strings(&["alpha"]), strings(&["alpha", "numeric", "email"])],
        )
        .collect();

        assert_eq!(mapped.len(), 2);
        assert_eq!(mapped[0].len(), 1);
        assert_eq!(mapped[0]["name"], "alpha");
        assert_eq!(mapped[1].len(), 2);
        assert_eq!(mapped[1]["label"], "numeric");
    }

    #[test]
    fn test_exclude_names_substring() {
        let names = strings(&["alpha", "long_alpha", "email", "long_utf8"]);
        let kept = exclude_names(names, Some(&strings(&["long"])));
        assert_eq!(kept, strings(&["alpha", "email"]));
    }

    #[test]
    fn test_exclude_names_exact() {
        let names = strings(&["name", "label", "description"]);
        let kept = exclude_names(names, Some(&strings(&["label"])));
        assert_eq!(kept, strings(&["name", "description"]));
    }
}
