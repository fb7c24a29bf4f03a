use std::io::{self, Write};

use rewind_core::{
    AccountSummary, ChartMarker, Execution, Kline, Order, Position, Presenter, TradingDate,
};
use serde::Serialize;
use serde_json::json;
use tracing::warn;

use crate::cli::OutputFormat;

/// Presenter printing each rendered part to a writer (stdout by default).
pub struct TerminalPresenter<W: Write + Send = io::Stdout> {
    out: W,
    format: OutputFormat,
    pretty: bool,
}

impl TerminalPresenter {
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(io::stdout(), format, pretty)
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W, format: OutputFormat, pretty: bool) -> Self {
        Self { out, format, pretty }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit_json<T: Serialize + ?Sized>(&mut self, part: &str, data: &T) {
        let payload = json!({ "part": part, "data": data });
        let encoded = if self.pretty {
            serde_json::to_string_pretty(&payload)
        } else {
            serde_json::to_string(&payload)
        };
        match encoded {
            Ok(line) => self.line(&line),
            Err(error) => warn!(part, "could not encode output: {error}"),
        }
    }

    fn line(&mut self, text: &str) {
        if let Err(error) = writeln!(self.out, "{text}") {
            warn!("could not write output: {error}");
        }
    }

    fn table<T>(&mut self, title: &str, rows: &[T], row: impl Fn(&T) -> String) {
        self.line(&format!("{title} ({})", rows.len()));
        if rows.is_empty() {
            self.line("  (none)");
        }
        for item in rows {
            self.line(&format!("  {}", row(item)));
        }
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn render_account(&mut self, summary: &AccountSummary) {
        match self.format {
            OutputFormat::Json => self.emit_json("account", summary),
            OutputFormat::Table => {
                self.line(&format!("balance     : {:.8}", summary.balance));
                self.line(&format!("total_equity: {:.8}", summary.total_equity));
                self.line(&format!("unrealized  : {:.8}", summary.unrealized_pnl));
            }
        }
    }

    fn render_positions(&mut self, positions: &[Position]) {
        match self.format {
            OutputFormat::Json => self.emit_json("positions", positions),
            OutputFormat::Table => self.table("positions", positions, |pos| {
                format!(
                    "{:<8} {:?} qty={} entry={:.1} now={:.1} pnl={:.8} ({:.2}%)",
                    pos.symbol,
                    pos.side,
                    pos.qty,
                    pos.entry_price,
                    pos.current_price,
                    pos.unrealized_pnl,
                    pos.unrealized_pnl_percent
                )
            }),
        }
    }

    fn render_orders(&mut self, orders: &[Order]) {
        match self.format {
            OutputFormat::Json => self.emit_json("orders", orders),
            OutputFormat::Table => self.table("orders", orders, |order| {
                format!(
                    "{} {:<8} {} {}@{:.1} {} {}",
                    order.timestamp,
                    order.symbol,
                    order.side.as_str(),
                    order.qty,
                    order.price,
                    order.order_type,
                    order.status
                )
            }),
        }
    }

    fn render_executions(&mut self, executions: &[Execution]) {
        match self.format {
            OutputFormat::Json => self.emit_json("executions", executions),
            OutputFormat::Table => self.table("executions", executions, |exec| {
                format!(
                    "{} {:<8} {} {}@{:.1} fee={:.8}",
                    exec.timestamp,
                    exec.symbol,
                    exec.side.as_str(),
                    exec.qty,
                    exec.price,
                    exec.commission
                )
            }),
        }
    }

    fn render_chart(&mut self, klines: &[Kline], markers: &[ChartMarker]) {
        match self.format {
            OutputFormat::Json => {
                self.emit_json("chart", &json!({ "klines": klines, "markers": markers }));
            }
            OutputFormat::Table => {
                let Some(last) = klines.last() else {
                    self.line("chart: no candles");
                    return;
                };
                self.line(&format!(
                    "chart: {} candles, last o={:.1} h={:.1} l={:.1} c={:.1}, {} markers",
                    klines.len(),
                    last.open,
                    last.high,
                    last.low,
                    last.close,
                    markers.len()
                ));
            }
        }
    }

    fn render_viewing_date(&mut self, date: TradingDate) {
        match self.format {
            OutputFormat::Json => self.emit_json("viewing_date", &date),
            OutputFormat::Table => self.line(&format!("== {date} ==")),
        }
    }

    fn set_historical_banner(&mut self, visible: bool, date: TradingDate) {
        match self.format {
            OutputFormat::Json => {
                self.emit_json("historical", &json!({ "visible": visible, "date": date }));
            }
            OutputFormat::Table if visible => self.line(&format!("[historical view: {date}]")),
            OutputFormat::Table => {}
        }
    }

    fn render_playback(&mut self, is_playing: bool) {
        match self.format {
            OutputFormat::Json => self.emit_json("playback", &json!({ "playing": is_playing })),
            OutputFormat::Table => self.line(if is_playing { "> playing" } else { "|| paused" }),
        }
    }

    fn report_error(&mut self, message: &str) {
        match self.format {
            OutputFormat::Json => self.emit_json("error", message),
            OutputFormat::Table => eprintln!("error: {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn printed(presenter: TerminalPresenter<Vec<u8>>) -> String {
        String::from_utf8(presenter.into_inner()).expect("utf8")
    }

    #[test]
    fn json_lines_are_tagged_by_part() {
        let mut presenter = TerminalPresenter::new(Vec::new(), OutputFormat::Json, false);
        let date = TradingDate::parse("2023-12-10").expect("date");

        presenter.render_viewing_date(date);
        presenter.render_playback(true);

        let output = printed(presenter);
        let lines: Vec<serde_json::Value> = output
            .lines()
            .map(|line| serde_json::from_str(line).expect("json line"))
            .collect();
        assert_eq!(lines[0]["part"], "viewing_date");
        assert_eq!(lines[0]["data"], "2023-12-10");
        assert_eq!(lines[1]["data"]["playing"], true);
    }

    #[test]
    fn table_banner_only_when_historical() {
        let mut presenter = TerminalPresenter::new(Vec::new(), OutputFormat::Table, false);
        let date = TradingDate::parse("2023-12-10").expect("date");

        presenter.set_historical_banner(false, date);
        presenter.set_historical_banner(true, date);

        assert_eq!(printed(presenter), "[historical view: 2023-12-10]\n");
    }

    #[test]
    fn empty_tables_say_none() {
        let mut presenter = TerminalPresenter::new(Vec::new(), OutputFormat::Table, false);

        presenter.render_orders(&[]);

        assert_eq!(printed(presenter), "orders (0)\n  (none)\n");
    }
}
