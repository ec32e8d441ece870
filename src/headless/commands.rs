//! Stdin commands for interactive headless mode
//!
//! One command per line, words separated by whitespace. Search text is
//! taken verbatim after the tab name.
//!
//! ```text
//! branch <id>            toggle a branch
//! testbed <id>           toggle a testbed
//! benchmark <id>         toggle a benchmark
//! measure [<id>]         select (or clear) the measure
//! report <row> [<id>]    select the report at a row of the reports page
//! plot <row>             load the saved plot at a row of the plots page
//! tab <tab>              switch tab
//! page <tab> <n>         go to a page
//! per_page <tab> <n>     change the page size
//! search <tab> [text]    type into a tab's search box
//! start <ms|->           set or clear the window start
//! end <ms|->             set or clear the window end
//! x_axis <axis>          date_time | version
//! back | forward         traverse history
//! r | refresh            re-fetch everything
//! q | quit
//! ```

use perfx_app::{FilterOp, HistoryStep, Message, PaginationOp};
use perfx_core::params::{parse_id, parse_timestamp};
use perfx_core::{ResourceId, Tab, XAxis};

/// Parse one stdin line. `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<Message>, String> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };
    let rest: Vec<&str> = words.collect();

    let msg = match command {
        "branch" => Message::Filter(FilterOp::ToggleBranch(id(&rest)?)),
        "testbed" => Message::Filter(FilterOp::ToggleTestbed(id(&rest)?)),
        "benchmark" => Message::Filter(FilterOp::ToggleBenchmark(id(&rest)?)),
        "measure" => Message::Filter(FilterOp::SetMeasure(rest.first().and_then(|s| parse_id(s)))),

        "report" => Message::ToggleReportChecked {
            index: row(&rest)?,
            measure: rest.get(1).and_then(|s| parse_id(s)),
        },
        "plot" => Message::TogglePlotChecked { index: row(&rest)? },

        "tab" => Message::Filter(FilterOp::SetTab(tab(&rest)?)),
        "page" => Message::Pagination(PaginationOp::SetPage {
            tab: tab(&rest)?,
            page: number(&rest)?,
        }),
        "per_page" => Message::Pagination(PaginationOp::SetPerPage {
            tab: tab(&rest)?,
            per_page: number(&rest)?,
        }),
        "search" => Message::SearchInput {
            tab: tab(&rest)?,
            text: after_words(line, 2).to_string(),
        },

        "start" => Message::Filter(FilterOp::SetStartTime(time(&rest)?)),
        "end" => Message::Filter(FilterOp::SetEndTime(time(&rest)?)),
        "x_axis" => {
            let axis = rest
                .first()
                .and_then(|s| s.parse::<XAxis>().ok())
                .ok_or("expected date_time or version")?;
            Message::Filter(FilterOp::SetXAxis(axis))
        }

        "back" => Message::Traverse(HistoryStep::Back),
        "forward" => Message::Traverse(HistoryStep::Forward),
        "r" | "refresh" => Message::Refresh,
        "q" | "quit" => Message::Quit,
        other => return Err(format!("unknown command {other:?}")),
    };
    Ok(Some(msg))
}

fn id(rest: &[&str]) -> Result<ResourceId, String> {
    rest.first()
        .and_then(|s| parse_id(s))
        .ok_or_else(|| "expected an id".to_string())
}

fn tab(rest: &[&str]) -> Result<Tab, String> {
    rest.first()
        .and_then(|s| s.parse::<Tab>().ok())
        .ok_or_else(|| "expected reports, branches, testbeds, benchmarks or plots".to_string())
}

/// `line` without its first `n` words, inner spacing untouched
fn after_words(line: &str, n: usize) -> &str {
    let mut rest = line.trim_start();
    for _ in 0..n {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        rest = rest[end..].trim_start();
    }
    rest
}

fn number(rest: &[&str]) -> Result<i64, String> {
    rest.get(1)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| "expected a number".to_string())
}

fn row(rest: &[&str]) -> Result<usize, String> {
    rest.first()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| "expected a row index".to_string())
}

fn time(rest: &[&str]) -> Result<Option<chrono::DateTime<chrono::Utc>>, String> {
    match rest.first() {
        None | Some(&"-") => Ok(None),
        Some(raw) => parse_timestamp(raw)
            .map(Some)
            .ok_or_else(|| "expected milliseconds since the epoch".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Message {
        parse_command(line).unwrap().unwrap()
    }

    #[test]
    fn test_blank_line_is_ignored() {
        assert!(parse_command("   ").unwrap().is_none());
    }

    #[test]
    fn test_toggle_commands() {
        assert!(matches!(
            parse("branch b1"),
            Message::Filter(FilterOp::ToggleBranch(id)) if id.as_str() == "b1"
        ));
        assert!(matches!(
            parse("measure"),
            Message::Filter(FilterOp::SetMeasure(None))
        ));
        assert!(parse_command("testbed").is_err());
    }

    #[test]
    fn test_pagination_commands() {
        assert!(matches!(
            parse("page benchmarks 3"),
            Message::Pagination(PaginationOp::SetPage {
                tab: Tab::Benchmarks,
                page: 3
            })
        ));
        // Out-of-range pages are clamped by the reducer, not rejected here
        assert!(matches!(
            parse("page plots -2"),
            Message::Pagination(PaginationOp::SetPage { page: -2, .. })
        ));
        assert!(parse_command("page nowhere 1").is_err());
    }

    #[test]
    fn test_search_keeps_spaces() {
        match parse("search benchmarks json parse") {
            Message::SearchInput { tab, text } => {
                assert_eq!(tab, Tab::Benchmarks);
                assert_eq!(text, "json parse");
            }
            other => panic!("expected SearchInput, got {other:?}"),
        }
    }

    #[test]
    fn test_search_keeps_repeated_spaces() {
        match parse("search  plots   a  b ") {
            Message::SearchInput { tab, text } => {
                assert_eq!(tab, Tab::Plots);
                assert_eq!(text, "a  b ");
            }
            other => panic!("expected SearchInput, got {other:?}"),
        }
        match parse("search plots") {
            Message::SearchInput { text, .. } => assert!(text.is_empty()),
            other => panic!("expected SearchInput, got {other:?}"),
        }
    }

    #[test]
    fn test_time_commands() {
        assert!(matches!(
            parse("start 1705320000000"),
            Message::Filter(FilterOp::SetStartTime(Some(_)))
        ));
        assert!(matches!(
            parse("end -"),
            Message::Filter(FilterOp::SetEndTime(None))
        ));
        assert!(parse_command("start yesterday").is_err());
    }

    #[test]
    fn test_row_commands() {
        assert!(matches!(
            parse("report 2 latency"),
            Message::ToggleReportChecked { index: 2, measure: Some(_) }
        ));
        assert!(matches!(parse("plot 0"), Message::TogglePlotChecked { index: 0 }));
    }

    #[test]
    fn test_lifecycle_commands() {
        assert!(matches!(parse("back"), Message::Traverse(HistoryStep::Back)));
        assert!(matches!(parse("r"), Message::Refresh));
        assert!(matches!(parse("quit"), Message::Quit));
        assert!(parse_command("reload").is_err());
    }
}
