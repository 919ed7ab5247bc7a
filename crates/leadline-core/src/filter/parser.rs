use crate::domain::{LeadStatus, TagName};
use crate::filter::ast::{FilterExpr, LeadFilter};
use crate::filter::FilterParseError;
use crate::rules::DueSelector;

/// Parses `ana #vip status:new source:"Chat Widget Web" due:today` style filters.
pub fn parse_filter(input: &str) -> Result<LeadFilter, FilterParseError> {
    let mut terms = Vec::new();

    for token in tokenize(input)? {
        if let Some(tag_raw) = token.strip_prefix('#') {
            if tag_raw.is_empty() {
                return Err(FilterParseError::EmptyTag);
            }
            let tag = TagName::new(tag_raw)
                .map_err(|_| FilterParseError::InvalidTag(tag_raw.to_string()))?;
            terms.push(FilterExpr::Tag(tag));
            continue;
        }

        let Some((key, value)) = token.split_once(':') else {
            terms.push(FilterExpr::Text(token));
            continue;
        };
        let expr = match key {
            "status" => {
                let status = value
                    .parse::<LeadStatus>()
                    .map_err(|_| FilterParseError::InvalidStatus(value.to_string()))?;
                FilterExpr::Status(status)
            }
            "due" => FilterExpr::Due(parse_due_selector(value)?),
            "source" => FilterExpr::Source(required_value(key, value)?),
            "country" => FilterExpr::Country(required_value(key, value)?),
            "city" => FilterExpr::City(required_value(key, value)?),
            _ => FilterExpr::Text(token.clone()),
        };
        terms.push(expr);
    }

    Ok(FilterExpr::And(terms))
}

fn required_value(key: &str, value: &str) -> Result<String, FilterParseError> {
    if value.trim().is_empty() {
        return Err(FilterParseError::EmptyValue(key.to_string()));
    }
    Ok(value.to_string())
}

fn parse_due_selector(raw: &str) -> Result<DueSelector, FilterParseError> {
    match raw {
        "overdue" => Ok(DueSelector::Overdue),
        "today" => Ok(DueSelector::Today),
        "any" => Ok(DueSelector::Any),
        "none" => Ok(DueSelector::None),
        _ => Err(FilterParseError::InvalidDueSelector(raw.to_string())),
    }
}

/// Whitespace split where double quotes group words; quotes are dropped.
fn tokenize(input: &str) -> Result<Vec<String>, FilterParseError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quoted = false;

    for ch in input.chars() {
        match ch {
            '"' => quoted = !quoted,
            ch if ch.is_whitespace() && !quoted => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            ch => current.push(ch),
        }
    }

    if quoted {
        return Err(FilterParseError::UnterminatedQuote);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::parse_filter;
    use crate::domain::{LeadStatus, TagName};
    use crate::filter::ast::FilterExpr;
    use crate::filter::FilterParseError;
    use crate::rules::DueSelector;

    #[test]
    fn parse_mixed_terms() {
        let filter = parse_filter("ana #VIP status:nuevo due:today").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![
                FilterExpr::Text("ana".to_string()),
                FilterExpr::Tag(TagName::new("VIP").unwrap()),
                FilterExpr::Status(LeadStatus::New),
                FilterExpr::Due(DueSelector::Today),
            ])
        );
    }

    #[test]
    fn quoted_values_keep_spaces() {
        let filter = parse_filter("source:\"Chat Widget Web\" country:USA").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![
                FilterExpr::Source("Chat Widget Web".to_string()),
                FilterExpr::Country("USA".to_string()),
            ])
        );
    }

    #[test]
    fn unknown_keys_are_text() {
        let filter = parse_filter("http://x").unwrap();
        assert_eq!(
            filter,
            FilterExpr::And(vec![FilterExpr::Text("http://x".to_string())])
        );
    }

    #[test]
    fn parse_errors() {
        assert_eq!(parse_filter("#").unwrap_err(), FilterParseError::EmptyTag);
        assert_eq!(
            parse_filter("status:won").unwrap_err(),
            FilterParseError::InvalidStatus("won".to_string())
        );
        assert_eq!(
            parse_filter("due:later").unwrap_err(),
            FilterParseError::InvalidDueSelector("later".to_string())
        );
        assert_eq!(
            parse_filter("city:").unwrap_err(),
            FilterParseError::EmptyValue("city".to_string())
        );
        assert_eq!(
            parse_filter("source:\"Chat").unwrap_err(),
            FilterParseError::UnterminatedQuote
        );
    }
}
