// File: crates/graph-core/tests/assemble.rs
// Purpose: End-to-end command assembly against a scripted renderer: period and value
//          probes, axis limits, overlay windows and error propagation.

use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use rrdgraph_core::charts::{self, Capabilities, ChartDef};
use rrdgraph_core::graph::{check_unique_names, overlay_span};
use rrdgraph_core::types::NULL_DEVICE;
use rrdgraph_core::{
    build_command, validate_source_path, Command, GraphError, GraphJob, RangeRequest, RenderOptions, Renderer,
    Result, TrendSpec, Window,
};

const DAY_REPORT: &str = "graph_left = 51\ngraph_start = 1000\ngraph_end = 87400\n";

struct FakeRenderer {
    period_report: &'static str,
    bounds_report: &'static str,
    fail_with: Option<i32>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl FakeRenderer {
    fn new(bounds_report: &'static str) -> Self {
        Self { period_report: DAY_REPORT, bounds_report, fail_with: None, calls: RefCell::new(Vec::new()) }
    }

    fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl Renderer for FakeRenderer {
    fn program(&self) -> &str { "rrdtool" }

    fn probe(&self, args: &[String]) -> Result<String> {
        self.calls.borrow_mut().push(args.to_vec());
        if let Some(code) = self.fail_with {
            return Err(GraphError::Subprocess {
                program: "rrdtool".into(),
                code: Some(code),
                stderr: "ERROR: opening '/data/freq.rrd': No such file or directory".into(),
            });
        }
        let report = if args[0] == "graphv" { self.period_report } else { self.bounds_report };
        Ok(report.to_string())
    }

    fn execute(&self, args: &[String]) -> Result<()> {
        self.calls.borrow_mut().push(args.to_vec());
        Ok(())
    }
}

fn floating_job() -> GraphJob {
    GraphJob {
        rrd: PathBuf::from("/data/freq.rrd"),
        image: PathBuf::from("out.png"),
        window: Window::Floating { start: "end-24h".into(), end: "now".into() },
        trend: TrendSpec::Auto,
        error_percent: 0.5,
        range: RangeRequest::default(),
    }
}

fn overlay_job(depth: u32) -> GraphJob {
    GraphJob { window: Window::Overlay { end: "now".into(), width: 86400, depth }, ..floating_job() }
}

fn build(id: &str, job: &GraphJob, r: &FakeRenderer) -> Result<Command> {
    let def = charts::find(id).expect("preset exists");
    build_command(&def, job, r, &RenderOptions::default())
}

/// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for Captured {
    type Writer = Captured;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn has(args: &[String], item: &str) -> bool {
    args.iter().any(|a| a == item)
}

fn has_pair(args: &[String], flag: &str, value: &str) -> bool {
    args.windows(2).any(|w| w[0] == flag && w[1] == value)
}

#[test]
fn normal_chart_gets_rigid_detected_limits() {
    let r = FakeRenderer::new("0x0\nMIN:49,5\nMAX:50,5\n");
    let cmd = build("normal", &floating_job(), &r).unwrap();

    assert_eq!(cmd.program, "rrdtool");
    assert_eq!(cmd.args[..2], ["graph", "out.png"]);
    let limits = ["--lower-limit", "49.49", "--upper-limit", "50.51", "--rigid"];
    assert!(cmd.args.windows(5).any(|w| w == limits), "{:?}", cmd.args);
    assert!(has_pair(&cmd.args, "--start", "end-24h"));
    assert!(has_pair(&cmd.args, "--end", "now"));
    assert!(has_pair(&cmd.args, "--title", "Частота в сети, <b>1д.</b>, Hz"));
    assert!(has(&cmd.args, "VDEF:g_min=r_min,0.5,PERCENTNAN"));
    assert!(has(&cmd.args, "VDEF:g_max=r_max,99.5,PERCENTNAN"));
    assert!(has(&cmd.args, "CDEF:t_avg=f_avg,1440,TRENDNAN"));
    assert!(has(&cmd.args, "SHIFT:t_avg:-720"));
    assert!(has(&cmd.args, "CDEF:ztick=NEWDAY,r_avg,POP"));
    assert!(!cmd.args.iter().any(|a| a.starts_with("PRINT:")));

    let calls = r.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0][0], "graphv");
    assert_eq!(calls[1][..2], ["graph", NULL_DEVICE]);
    assert!(has(&calls[1], "PRINT:g_min:MIN\\:%lf"));
    assert!(has(&calls[1], "PRINT:g_max:MAX\\:%lf"));
}

#[test]
fn no_data_leaves_axis_on_auto() {
    let r = FakeRenderer::new("0x0\nMIN:nan\nMAX:nan\n");
    let cmd = build("normal", &floating_job(), &r).unwrap();
    for flag in ["--lower-limit", "--upper-limit", "--rigid"] {
        assert!(!has(&cmd.args, flag), "{flag} unexpected");
    }
}

#[test]
fn no_data_is_logged_as_warning() {
    let log = Captured::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(log.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let r = FakeRenderer::new("0x0\nMIN:nan\nMAX:nan\n");
    tracing::subscriber::with_default(subscriber, || build("normal", &floating_job(), &r)).unwrap();

    let text = log.text();
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("no data to detect the value range of `normal`"), "{text}");
}

#[test]
fn detected_range_is_not_a_warning() {
    let log = Captured::default();
    let subscriber = tracing_subscriber::fmt().with_writer(log.clone()).with_max_level(tracing::Level::WARN).finish();
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    tracing::subscriber::with_default(subscriber, || build("normal", &floating_job(), &r)).unwrap();
    assert!(log.text().is_empty(), "{}", log.text());
}

#[test]
fn explicit_limits_skip_value_probe() {
    let r = FakeRenderer::new("MIN:0\nMAX:1\n");
    let job = GraphJob {
        range: RangeRequest { detect: true, lower: Some(49.0), upper: Some(51.0) },
        ..floating_job()
    };
    let cmd = build("normal", &job, &r).unwrap();
    assert_eq!(r.calls().len(), 1, "only the period probe runs");
    assert!(has_pair(&cmd.args, "--lower-limit", "49"));
    assert!(has_pair(&cmd.args, "--upper-limit", "51"));
    assert!(has(&cmd.args, "--rigid"));
}

#[test]
fn explicit_side_overrides_detection() {
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    let job = GraphJob { range: RangeRequest { detect: true, lower: Some(49.0), upper: None }, ..floating_job() };
    let cmd = build("normal", &job, &r).unwrap();
    assert!(has_pair(&cmd.args, "--lower-limit", "49"));
    assert!(has_pair(&cmd.args, "--upper-limit", "50.51"));
}

#[test]
fn inverted_explicit_limits_are_rejected() {
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    for (lower, upper) in [(51.0, 49.0), (50.0, 50.0)] {
        let job = GraphJob {
            range: RangeRequest { detect: true, lower: Some(lower), upper: Some(upper) },
            ..floating_job()
        };
        assert!(matches!(build("normal", &job, &r), Err(GraphError::Validation(_))), "{lower} .. {upper}");
    }
    assert!(r.calls().is_empty());
}

#[test]
fn explicit_lower_above_detected_upper_is_rejected() {
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    let job = GraphJob { range: RangeRequest { detect: true, lower: Some(51.0), upper: None }, ..floating_job() };
    let err = build("normal", &job, &r).unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
    assert!(err.to_string().contains("51 .. 50.51"), "{err}");
}

#[test]
fn no_detect_skips_value_probe() {
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    let job = GraphJob { range: RangeRequest { detect: false, lower: None, upper: None }, ..floating_job() };
    let cmd = build("normal", &job, &r).unwrap();
    assert_eq!(r.calls().len(), 1);
    assert!(!has(&cmd.args, "--rigid"));
}

#[test]
fn rate_chart_is_floored_at_zero() {
    let r = FakeRenderer::new("MAX:0,2\n");
    let cmd = build("diff", &floating_job(), &r).unwrap();
    let limits = ["--lower-limit", "0", "--upper-limit", "0.202", "--rigid"];
    assert!(cmd.args.windows(5).any(|w| w == limits), "{:?}", cmd.args);
    assert!(has(&cmd.args, "DEF:r_avg=/data/freq.rrd:freq_var:AVERAGE"));

    let calls = r.calls();
    assert!(has(&calls[1], "PRINT:g_max:MAX\\:%lf"));
    assert!(!calls[1].iter().any(|a| a.starts_with("PRINT:g_min")));
}

#[test]
fn floor_applies_without_detection() {
    let r = FakeRenderer::new("");
    let job = GraphJob { range: RangeRequest { detect: false, lower: None, upper: None }, ..floating_job() };
    let cmd = build("spread", &job, &r).unwrap();
    let limits = ["--lower-limit", "0", "--rigid", "--alt-autoscale-max"];
    assert!(cmd.args.windows(4).any(|w| w == limits), "{:?}", cmd.args);
}

#[test]
fn overlay_needs_no_period_probe() {
    let r = FakeRenderer::new("MIN:49,5\nMAX:50,5\n");
    let cmd = build("overlap", &overlay_job(3), &r).unwrap();

    let calls = r.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0][0], "graph");

    let args = &cmd.args;
    assert!(has_pair(args, "--start", "now-86400"));
    assert!(has_pair(args, "--end", "now"));
    assert!(has(args, "DEF:r_i2_avg=/data/freq.rrd:freq:AVERAGE:start=now-259200:end=now-172800"));
    assert!(has(args, "SHIFT:r_i2_avg:172800"));
    assert!(has(args, "SHIFT:r_i0_min:0"));
    assert!(has(args, "CDEF:r_min=r_i0_min,r_i1_min,MINNAN,r_i2_min,MINNAN"));
    assert!(has(args, "CDEF:r_avg=r_i0_avg,r_i1_avg,r_i2_avg,3,AVG"));
    assert!(has(args, "CDEF:t_i0_avg=f_i0_avg,1440,TRENDNAN"));
    assert!(has(args, "LINE1:r_i0_avg#FFFF007F::skipscale"));
    assert!(has(args, "LINE1:r_i1_avg#80FF807F::skipscale"));
    assert!(has(args, "LINE1:r_i2_avg#00FFFF7F::skipscale"));
    assert!(has(args, "LINE1:t_i0_avg#7F7F00:-0,"));
    assert!(has_pair(args, "--title", "Совмещенная частота в сети, <b>3</b> периодов по <b>1д.</b>, Hz"));

    // oldest slice is drawn first
    let oldest = args.iter().position(|a| a.starts_with("LINE1:r_i2_avg")).unwrap();
    let recent = args.iter().position(|a| a.starts_with("LINE1:r_i0_avg")).unwrap();
    assert!(oldest < recent);
}

#[test]
fn overlay_rate_chart_uses_zero_floor() {
    let r = FakeRenderer::new("MAX:0,4\n");
    let cmd = build("overlap-diff", &overlay_job(2), &r).unwrap();
    assert!(has(&cmd.args, "CDEF:f_i1_avg=r_i1_avg,0,g_max,LIMIT"));
    assert!(has_pair(&cmd.args, "--lower-limit", "0"));
    assert!(has_pair(&cmd.args, "--upper-limit", "0.404"));
    assert!(!cmd.args.iter().any(|a| a.starts_with("VDEF:g_min")));
}

#[test]
fn oversized_overlay_is_rejected() {
    let r = FakeRenderer::new("");
    for id in ["overlap", "overlap-diff"] {
        for width in [u64::MAX / 2 + 1, 1 << 62] {
            let job = GraphJob { window: Window::Overlay { end: "now".into(), width, depth: 2 }, ..floating_job() };
            assert!(matches!(build(id, &job, &r), Err(GraphError::Validation(_))), "{id} {width}");
        }
    }
    assert!(r.calls().is_empty());

    assert_eq!(overlay_span(86400, 7).unwrap(), 604_800);
    assert_eq!(overlay_span(i64::MAX as u64, 1).unwrap(), i64::MAX);
    assert!(matches!(overlay_span(0, 3), Err(GraphError::Validation(_))));
    assert!(matches!(overlay_span(86400, 0), Err(GraphError::Validation(_))));
}

#[test]
fn window_kind_must_match_chart() {
    let r = FakeRenderer::new("");
    assert!(matches!(build("normal", &overlay_job(2), &r), Err(GraphError::Validation(_))));
    assert!(matches!(build("overlap", &floating_job(), &r), Err(GraphError::Validation(_))));
    assert!(r.calls().is_empty());
}

#[test]
fn renderer_failure_propagates() {
    let r = FakeRenderer { fail_with: Some(3), ..FakeRenderer::new("") };
    let err = build("normal", &floating_job(), &r).unwrap_err();
    assert_eq!(err.exit_code(), Some(3));
    assert!(err.to_string().contains("No such file"));
}

#[test]
fn zero_trend_window_is_rejected() {
    let r = FakeRenderer::new("");
    let job = GraphJob { trend: TrendSpec::Seconds(0), ..floating_job() };
    assert!(matches!(build("normal", &job, &r), Err(GraphError::Validation(_))));
}

#[test]
fn error_percent_is_bounded() {
    let r = FakeRenderer::new("");
    let job = GraphJob { error_percent: 50.0, ..floating_job() };
    assert!(matches!(build("normal", &job, &r), Err(GraphError::Validation(_))));
}

#[test]
fn duplicate_series_are_rejected() {
    let decls = ["DEF:a=/f.rrd:freq:MIN".to_string(), "CDEF:a=a,1,+".to_string()];
    assert!(matches!(check_unique_names(&decls), Err(GraphError::Validation(_))));

    let def = ChartDef {
        id: "dup",
        about: "duplicate names",
        source: "freq",
        caps: Capabilities::default(),
        declare: |_| Ok(vec!["VDEF:g=a,AVERAGE".to_string(), "VDEF:g=a,LAST".to_string()]),
    };
    let r = FakeRenderer::new("");
    let err = build_command(&def, &floating_job(), &r, &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, GraphError::Validation(_)));
}

#[test]
fn presets_build_without_duplicates() {
    for def in charts::presets() {
        let r = FakeRenderer::new("");
        let job = if def.caps.overlay { overlay_job(4) } else { floating_job() };
        build_command(&def, &job, &r, &RenderOptions::default())
            .unwrap_or_else(|e| panic!("{} failed: {e}", def.id));
    }
}

#[test]
fn base_flags_and_quoting() {
    let base = RenderOptions::default().base_args("out.png".as_ref());
    assert_eq!(
        base,
        [
            "graph", "out.png", "--width", "960", "--height", "384", "--pango-markup", "--tabwidth", "100",
            "--alt-autoscale", "--alt-y-grid", "--color", "BACK#FFFFFF00",
        ]
    );

    let cmd = Command::new("rrdtool", vec!["graph".into(), "it's.png".into()]);
    assert_eq!(cmd.shell_quoted(), "'rrdtool' 'graph' 'it'\\''s.png'");
    assert_eq!(cmd.to_string(), cmd.shell_quoted());
}

#[test]
fn source_path_validation() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("freq.rrd");
    std::fs::write(&file, b"RRD").unwrap();

    let abs = validate_source_path(&file).unwrap();
    assert!(abs.is_absolute());
    assert!(matches!(validate_source_path(dir.path()), Err(GraphError::Validation(_))));
    assert!(matches!(validate_source_path(&dir.path().join("missing.rrd")), Err(GraphError::Validation(_))));
}
