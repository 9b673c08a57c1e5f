use farmseva::ingest::read_csv;
use farmseva::prelude::*;
use farmseva::store::{ApplicationStatus, Bookmarks, JsonFileStore};

const SCHEME_SHEET: &str = "\
Govt Scheme Name,Scheme Description,Ministry / Department Name,Benefits Provided
Scheme name,Description,Ministry,Benefits
,,,
National Livestock Mission - Piggery,Assistance for pig breeding farms,Department of Animal Husbandry,1. Capital subsidy of 50%. 2. Training for farmers.
Rashtriya Gokul Mission,Development of indigenous cattle breeds,Department of Animal Husbandry,Breed improvement. Milk yield support
Poultry and Fish Integrated Farming,Backyard units with ponds,,Subsidy on feed. Free chicks
Agriculture Infrastructure Fund,Post harvest management,Ministry of Agriculture,
";

const OUTBREAK_SHEET: &str = "\
OBTID,Type,DiseaseName,Your Locations Effected,Other Locations Effected,Possible Preventive Measure
1,Outbreak,African Swine Fever,\"Pune, Greater Mumbai\",\"Nagpur, Nashik\",1. Restrict movement of pigs 2. Disinfect vehicles
2,Alert,Avian Influenza,Nagpur,Pune,• Cull infected birds • Report unusual deaths
3,,Unnamed,Pune,,
4,Info,Lumpy Skin Disease,Kolhapur,,
";

#[test]
fn schemes_from_csv() {
    let records = read_csv(SCHEME_SHEET.as_bytes(), 2).unwrap();
    assert_eq!(records.len(), 4);

    let processor = Processor::default();
    let views = processor.schemes(&records);
    let names: Vec<_> = views
        .iter()
        .map(|v| v.record.name.as_deref().unwrap_or(""))
        .collect();
    assert_eq!(
        names,
        vec![
            "National Livestock Mission - Piggery",
            "Poultry and Fish Integrated Farming",
            "Agriculture Infrastructure Fund",
        ]
    );

    assert_eq!(views[0].categories, vec![CategoryTag::PigFarming]);
    assert_eq!(
        views[0].benefits,
        vec!["Capital subsidy of 50%.", "Training for farmers."]
    );
    assert_eq!(views[1].benefits, vec!["Subsidy on feed.", "Free chicks."]);
    assert_eq!(views[2].categories, vec![CategoryTag::GeneralAgriculture]);

    let categories = processor
        .classifier()
        .available_categories(views.iter().map(|v| &v.record));
    insta::assert_json_snapshot!(categories, @r###"
    [
      "Pig Farming",
      "Poultry Farming",
      "General Agriculture"
    ]
    "###);
}

#[test]
fn scheme_queries_combine_search_and_category() {
    let records = read_csv(SCHEME_SHEET.as_bytes(), 2).unwrap();
    let processor = Processor::default();
    let views = processor.schemes(&records);

    let general = SchemeQuery {
        search: String::new(),
        categories: vec![CategoryTag::GeneralAgriculture],
    };
    let hits = general.apply(processor.classifier(), &views);
    assert_eq!(hits.len(), 1);
    assert_eq!(
        hits[0].record.name.as_deref(),
        Some("Agriculture Infrastructure Fund")
    );

    let by_ministry = SchemeQuery {
        search: "animal husbandry".to_string(),
        categories: vec![],
    };
    assert_eq!(by_ministry.apply(processor.classifier(), &views).len(), 1);
}

#[test]
fn outbreaks_from_csv() {
    let records = read_csv(OUTBREAK_SHEET.as_bytes(), 0).unwrap();
    let config = ConfigBuilder::new().current_alert_count(2).build().unwrap();
    let processor = Processor::new(config);
    let views = processor.outbreaks(&records, Some("mumbai"));

    assert_eq!(views.len(), 3);
    assert_eq!(
        views[0].your_locations.iter().collect::<Vec<_>>(),
        vec!["Pune", "Greater Mumbai"]
    );
    assert!(views[0].is_near_you);
    assert!(!views[1].is_near_you);
    assert_eq!(
        views[0].preventive_measures,
        vec!["Restrict movement of pigs", "Disinfect vehicles"]
    );
    assert_eq!(
        views[1].preventive_measures,
        vec!["Cull infected birds", "Report unusual deaths"]
    );
    assert_eq!(views[2].severity, Severity::Info);

    let history = OutbreakQuery {
        tab: AlertTab::History,
        ..Default::default()
    };
    let hits = history.apply(&views);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, 3);

    let alerts_only = OutbreakQuery {
        alert_type: "ALERT".to_string(),
        ..Default::default()
    };
    let hits = alerts_only.apply(&views);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].record.disease.as_deref(), Some("Avian Influenza"));

    let searched = OutbreakQuery {
        search: "swine".to_string(),
        ..Default::default()
    };
    assert_eq!(searched.apply(&views).len(), 1);
}

#[test]
fn bookmarks_survive_reopening_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("bookmarks.json");

    {
        let mut bookmarks = Bookmarks::new(JsonFileStore::open(&path).unwrap());
        assert!(bookmarks.toggle_saved_scheme("PM-KISAN").unwrap());
        bookmarks
            .set_applied_status("PM-KISAN", ApplicationStatus::Applied, chrono::Utc::now())
            .unwrap();
    }

    let bookmarks = Bookmarks::new(JsonFileStore::open(&path).unwrap());
    assert_eq!(bookmarks.saved_schemes().unwrap(), vec!["PM-KISAN"]);
    assert_eq!(
        bookmarks.applied_status("PM-KISAN").unwrap(),
        Some(ApplicationStatus::Applied)
    );
}

#[test]
fn corrupt_store_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bookmarks.json");
    std::fs::write(&path, "not json").unwrap();

    let err = JsonFileStore::open(&path).unwrap_err();
    assert!(matches!(err, Error::Store(_)));
}
