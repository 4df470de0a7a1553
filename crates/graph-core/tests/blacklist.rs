// File: crates/graph-core/tests/blacklist.rs
// Purpose: Blacklist parsing and the dump filter.

use rrdgraph_core::{filter_dump, Blacklist};

const DUMP: &str = "<rrd>\n\
\t<database>\n\
\t\t<!-- 2020-01-01 00:01:40 UTC / 100 --> <row><v>4.9950000000e+01</v><v>5.0010000000e+01</v></row>\n\
\t\t<!-- 2020-01-01 00:02:30 UTC / 150 --> <row><v>4.9960000000e+01</v><v>5.0020000000e+01</v></row>\n\
\t\t<!-- 2020-01-01 00:04:10 UTC / 250 --> <row><v>4.9970000000e+01</v><v>NaN</v></row>\n\
\t</database>\n\
</rrd>\n";

#[test]
fn parse_ranges_with_comments() {
    let text = "# maintenance windows\n100:200 # transformer swap\n\nnot a range\n300:400\n";
    let bl = Blacklist::from_reader(text.as_bytes()).unwrap();
    assert_eq!(bl.ranges(), &[(100, 200), (300, 400)]);
}

#[test]
fn ranges_are_inclusive() {
    let bl = Blacklist::new(vec![(100, 200)]);
    assert!(bl.contains(100));
    assert!(bl.contains(200));
    assert!(!bl.contains(99));
    assert!(!bl.contains(201));
}

#[test]
fn filter_blanks_rows_in_range() {
    let bl = Blacklist::new(vec![(120, 200)]);
    let mut out = Vec::new();
    let rewritten = filter_dump(DUMP.as_bytes(), &mut out, &bl).unwrap();
    assert_eq!(rewritten, 1);

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), DUMP.lines().count());
    assert!(lines[2].ends_with("<row><v>4.9950000000e+01</v><v>5.0010000000e+01</v></row>"));
    assert!(lines[3].ends_with("/ 150 --> <row><v> NaN </v><v> NaN </v></row>"));
    assert_eq!(lines[4], DUMP.lines().nth(4).unwrap());
}

#[test]
fn empty_blacklist_copies_verbatim() {
    let mut out = Vec::new();
    let rewritten = filter_dump(DUMP.as_bytes(), &mut out, &Blacklist::default()).unwrap();
    assert_eq!(rewritten, 0);
    assert_eq!(String::from_utf8(out).unwrap(), DUMP);
}
