use gre_table_to_csv::{GroupSuffix, RawGrid, ReportLayout};

pub const HEADER: [&str; 16] = [
    "Intended Graduate\nMajor",
    "VR 160-\n170",
    "VR 130- 159",
    "VR M",
    "VR SD",
    "VR N",
    "QR 160-\n170",
    "QR 130- 159",
    "QR M",
    "QR SD",
    "QR N",
    "AW 4.0-\n6.0",
    "AW 0.0- 3.5",
    "AW M",
    "AW SD",
    "AW N",
];

pub fn grid(rows: &[&[&str]]) -> RawGrid {
    RawGrid::new(
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
            .collect(),
    )
}

/// Two pages: one supercategory, two leaves, an empty leaf and a placeholder.
/// The second page repeats the header and the last row of the first page.
pub fn engineering_pages() -> Vec<RawGrid> {
    const CIVIL: [&str; 16] = [
        "Civil", "20", "80", "160.0", "6.0", "300", "50", "50", "156.0", "9.0", "300", "30", "70",
        "3.9", "0.9", "300",
    ];

    vec![
        grid(&[
            &HEADER,
            &[
                "ENGINEERING", "25", "75", "157.5", "6.5", "400", "44", "56", "155.0", "8.5",
                "400", "25", "75", "3.8", "0.9", "400",
            ],
            &[
                "Chemical", "40", "60", "150.0", "7.0", "100", "25", "75", "152.0", "8.0", "100",
                "10", "90", "3.5", "0.8", "100",
            ],
            &CIVIL,
        ]),
        grid(&[
            &HEADER,
            &CIVIL,
            &["Undeclared"],
            &[
                "Other Fields â”€ Other*", "10", "90", "145.0", "9.0", "1,250", "10", "90",
                "150.0", "9.5", "1,250", "5", "95", "3.2", "0.9", "1,250",
            ],
        ]),
    ]
}

pub fn engineering_layout() -> ReportLayout {
    ReportLayout {
        expected_pages: 2,
        expected_categories: 5,
        group_suffixes: vec![GroupSuffix::new(2, 3, "Engineering")],
        supercategories: vec!["01: ENGINEERING".to_string()],
        placeholders: vec!["05: Other Fields: Other*".to_string()],
        ..ReportLayout::default()
    }
}

pub const ENGINEERING_CSV: &str = concat!(
    "Intended Graduate Major,",
    "VR: 160 - 170,VR: 130 - 159,VR: Mean,VR: SD,VR: N,",
    "QR: 160 - 170,QR: 130 - 159,QR: Mean,QR: SD,QR: N,",
    "AW: 4.0 - 6.0,AW: 0.0 - 3.5,AW: Mean,AW: SD,AW: N\n",
    "01: ENGINEERING,25.0,75.0,157.5,6.5,400.0,44.0,56.0,155.0,8.5,400.0,25.0,75.0,3.8,0.9,400.0\n",
    "02: Chemical Engineering,",
    "40.0,60.0,150.0,7.0,100.0,25.0,75.0,152.0,8.0,100.0,10.0,90.0,3.5,0.8,100.0\n",
    "03: Civil Engineering,",
    "20.0,80.0,160.0,6.0,300.0,50.0,50.0,156.0,9.0,300.0,30.0,70.0,3.9,0.9,300.0\n",
    "04: Undeclared,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0,0.0\n",
    "05: Other Fields: Other*,",
    "10.0,90.0,145.0,9.0,1250.0,10.0,90.0,150.0,9.5,1250.0,5.0,95.0,3.2,0.9,1250.0\n",
    "06: GRAND TOTAL,",
    "25.0,75.0,157.5,4.34,400.0,43.75,56.25,155.0,1.73,400.0,25.0,75.0,3.8,0.17,400.0\n",
    "07: ETS-Provided Population,",
    "0.0,0.0,151.29,8.27,1039310.0,0.0,0.0,156.93,9.89,1041330.0,0.0,0.0,3.49,0.88,1037639.0\n",
);

/// Four pages of fifteen categories shaped like the default report layout.
/// Roll-up and "other" rows carry the labels the default layout expects.
pub fn report_shaped_pages() -> Vec<RawGrid> {
    let names = (1..=60)
        .map(|position| match position {
            1 => "LIFE SCIENCES".to_string(),
            5 => "PHYSICAL SCIENCES".to_string(),
            12 => "ENGINEERING".to_string(),
            20 => "SOC. & BEHAVIORAL SCI.".to_string(),
            27 => "HUMANITIES & ARTS".to_string(),
            35 => "EDUCATION".to_string(),
            46 => "BUSINESS".to_string(),
            52 => "OTHER FIELDS".to_string(),
            60 => "Other Fields, Other*".to_string(),
            _ => format!("Major {position}"),
        })
        .collect::<Vec<_>>();

    names
        .chunks(15)
        .map(|chunk| {
            let mut rows = vec![HEADER.map(str::to_string).to_vec()];
            for name in chunk {
                let mut row = vec![name.clone()];
                for _ in 0..2 {
                    row.extend(["50", "50", "150.0", "8.0", "10"].map(str::to_string));
                }
                row.extend(["50", "50", "3.5", "0.8", "10"].map(str::to_string));
                rows.push(row);
            }
            RawGrid::new(rows)
        })
        .collect()
}
