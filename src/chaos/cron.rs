// Copyright 2024 The Kubernetes Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Standard five-field cron expressions.
//!
//! Accepts `minute hour day-of-month month day-of-week` with day-of-week
//! 0-6 (0 is Sunday), plus the `@yearly`-style descriptors and
//! `@every <duration>`. Field grammar is checked by the `cron` crate, which
//! expects a leading seconds field and numbers weekdays 1-7.

use super::duration::{parse_duration, DurationError};
use ::cron::Schedule;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

const EVERY_PREFIX: &str = "@every ";

/// CronSchedule is the parsed form of a cron expression.
#[derive(Debug, Clone)]
pub enum CronSchedule {
    /// Fires on calendar matches.
    Calendar(Schedule),
    /// Fires at a constant interval.
    Every(Duration),
}

/// CronError describes why a cron expression was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CronError {
    #[error("empty spec string")]
    Empty,

    #[error("timezone prefixes (TZ=, CRON_TZ=) are deliberately unsupported: {0:?}")]
    Timezone(String),

    #[error("expected exactly 5 fields, found {found}: {expr:?}")]
    FieldCount { found: usize, expr: String },

    #[error("unrecognized descriptor: {0}")]
    UnknownDescriptor(String),

    #[error("failed to parse duration {expr}: {source}")]
    Every {
        expr: String,
        #[source]
        source: DurationError,
    },

    #[error("invalid step in {term:?}: step must be a positive number")]
    Step { term: String },

    #[error("{reason}")]
    Syntax { expr: String, reason: String },
}

/// Parse a standard cron expression. Pure and reentrant.
pub fn parse_standard(expr: &str) -> Result<CronSchedule, CronError> {
    let expr = expr.trim();
    if expr.is_empty() {
        return Err(CronError::Empty);
    }
    if expr.starts_with("TZ=") || expr.starts_with("CRON_TZ=") {
        return Err(CronError::Timezone(expr.to_string()));
    }
    if expr.starts_with('@') {
        return parse_descriptor(expr);
    }

    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(CronError::FieldCount {
            found: fields.len(),
            expr: expr.to_string(),
        });
    }
    for field in &fields {
        check_steps(field)?;
    }

    let translated = format!(
        "0 {} {} {} {} {}",
        any_marker(fields[0]),
        any_marker(fields[1]),
        any_marker(fields[2]),
        any_marker(fields[3]),
        shift_weekdays(expr, fields[4])?,
    );
    calendar(expr, &translated)
}

fn parse_descriptor(expr: &str) -> Result<CronSchedule, CronError> {
    match expr {
        "@yearly" | "@annually" => calendar(expr, "0 0 0 1 1 *"),
        "@monthly" => calendar(expr, "0 0 0 1 * *"),
        "@weekly" => calendar(expr, "0 0 0 * * 1"),
        "@daily" | "@midnight" => calendar(expr, "0 0 0 * * *"),
        "@hourly" => calendar(expr, "0 0 * * * *"),
        _ => {
            let Some(interval) = expr.strip_prefix(EVERY_PREFIX) else {
                return Err(CronError::UnknownDescriptor(expr.to_string()));
            };
            let interval = parse_duration(interval.trim()).map_err(|source| CronError::Every {
                expr: expr.to_string(),
                source,
            })?;
            Ok(CronSchedule::Every(interval.max(Duration::from_secs(1))))
        }
    }
}

fn calendar(expr: &str, six_field: &str) -> Result<CronSchedule, CronError> {
    Schedule::from_str(six_field)
        .map(CronSchedule::Calendar)
        .map_err(|e| CronError::Syntax {
            expr: expr.to_string(),
            reason: format!("failed to parse {:?}: {}", expr, e),
        })
}

fn check_steps(field: &str) -> Result<(), CronError> {
    for term in field.split(',') {
        if let Some((_, step)) = term.split_once('/') {
            if !matches!(step.parse::<u32>(), Ok(n) if n > 0) {
                return Err(CronError::Step {
                    term: term.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn any_marker(field: &str) -> &str {
    if field == "?" {
        "*"
    } else {
        field
    }
}

/// Move numeric weekdays from 0-6 to 1-7. Names, wildcards and step sizes
/// are left untouched.
fn shift_weekdays(expr: &str, field: &str) -> Result<String, CronError> {
    let mut terms = Vec::new();
    for term in field.split(',') {
        let (range, step) = match term.split_once('/') {
            Some((range, step)) => (range, Some(step)),
            None => (term, None),
        };
        let range = if range == "*" || range == "?" {
            "*".to_string()
        } else {
            let mut values = Vec::new();
            for value in range.split('-') {
                if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                    values.push(value.to_string());
                    continue;
                }
                match value.parse::<u32>() {
                    Ok(n) if n <= 6 => values.push((n + 1).to_string()),
                    _ => {
                        return Err(CronError::Syntax {
                            expr: expr.to_string(),
                            reason: format!(
                                "failed to parse {:?}: day-of-week {} is out of range 0-6",
                                expr, value
                            ),
                        })
                    }
                }
            }
            values.join("-")
        };
        terms.push(match step {
            Some(step) => format!("{}/{}", range, step),
            None => range,
        });
    }
    Ok(terms.join(","))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_expressions() {
        for expr in [
            "*/5 * * * *",
            "0 0 * * 0",
            "0 0 * * 6",
            "30 2 1 * *",
            "0 12 * * MON-FRI",
            "0 9 * * 1-5",
            "15,45 */2 * JAN,JUL *",
            "0 0 ? * *",
            "  0 0 * * *  ",
        ] {
            assert!(
                matches!(parse_standard(expr), Ok(CronSchedule::Calendar(_))),
                "expected {:?} to parse",
                expr
            );
        }
    }

    #[test]
    fn test_descriptors() {
        for expr in ["@yearly", "@annually", "@monthly", "@weekly", "@daily", "@midnight", "@hourly"] {
            assert!(
                matches!(parse_standard(expr), Ok(CronSchedule::Calendar(_))),
                "expected {:?} to parse",
                expr
            );
        }
    }

    #[test]
    fn test_every() {
        match parse_standard("@every 1h30m") {
            Ok(CronSchedule::Every(d)) => assert_eq!(d, Duration::from_secs(5400)),
            other => panic!("unexpected result: {:?}", other),
        }
        match parse_standard("@every 100ms") {
            Ok(CronSchedule::Every(d)) => assert_eq!(d, Duration::from_secs(1)),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_standard("").unwrap_err(), CronError::Empty);
        assert_eq!(parse_standard("   ").unwrap_err(), CronError::Empty);
        assert_eq!(parse_standard("").unwrap_err().to_string(), "empty spec string");
    }

    #[test]
    fn test_wrong_field_count() {
        assert_eq!(
            parse_standard("* * * *").unwrap_err(),
            CronError::FieldCount {
                found: 4,
                expr: "* * * *".to_string()
            }
        );
        assert!(matches!(
            parse_standard("0 0 0 * * *"),
            Err(CronError::FieldCount { found: 6, .. })
        ));
        assert!(matches!(
            parse_standard("not a cron"),
            Err(CronError::FieldCount { found: 3, .. })
        ));
    }

    #[test]
    fn test_out_of_range_fields() {
        assert!(matches!(parse_standard("60 * * * *"), Err(CronError::Syntax { .. })));
        assert!(matches!(parse_standard("* 24 * * *"), Err(CronError::Syntax { .. })));
        assert!(matches!(parse_standard("* * 32 * *"), Err(CronError::Syntax { .. })));
        assert!(matches!(parse_standard("0 0 * * 7"), Err(CronError::Syntax { .. })));
    }

    #[test]
    fn test_zero_step() {
        assert_eq!(
            parse_standard("*/0 * * * *").unwrap_err(),
            CronError::Step {
                term: "*/0".to_string()
            }
        );
    }

    #[test]
    fn test_descriptor_errors() {
        assert_eq!(
            parse_standard("@fortnightly").unwrap_err(),
            CronError::UnknownDescriptor("@fortnightly".to_string())
        );
        assert!(matches!(
            parse_standard("@every 5"),
            Err(CronError::Every {
                source: DurationError::MissingUnit(_),
                ..
            })
        ));
        assert!(matches!(
            parse_standard("@every -5m"),
            Err(CronError::Every {
                source: DurationError::Negative(_),
                ..
            })
        ));
    }

    #[test]
    fn test_timezone_rejected() {
        assert!(matches!(
            parse_standard("CRON_TZ=UTC 0 0 * * *"),
            Err(CronError::Timezone(_))
        ));
        assert!(matches!(
            parse_standard("TZ=Asia/Shanghai 0 0 * * *"),
            Err(CronError::Timezone(_))
        ));
        let err = parse_standard("TZ=UTC 0 0 * * *").unwrap_err();
        assert!(err.to_string().contains("deliberately unsupported"));
    }

    #[test]
    fn test_shift_weekdays() {
        let shift = |field| shift_weekdays("", field).unwrap();
        assert_eq!(shift("0"), "1");
        assert_eq!(shift("1-5"), "2-6");
        assert_eq!(shift("0,6"), "1,7");
        assert_eq!(shift("*/2"), "*/2");
        assert_eq!(shift("1-5/2"), "2-6/2");
        assert_eq!(shift("MON-FRI"), "MON-FRI");
        assert_eq!(shift("?"), "*");
    }

    #[test]
    fn test_weekday_out_of_range() {
        for expr in ["0 0 * * 4294967295", "0 0 * * 99999999999", "0 0 * * 1-4294967295", "0 0 * * 7"] {
            assert!(
                matches!(parse_standard(expr), Err(CronError::Syntax { .. })),
                "expected {:?} to be rejected",
                expr
            );
        }
        let err = parse_standard("0 0 * * 4294967295").unwrap_err();
        assert!(err.to_string().contains("day-of-week 4294967295 is out of range 0-6"));
    }
}
