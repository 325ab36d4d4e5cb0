
use fixtures::*;
use pretty_assertions::assert_eq;
use psgc_picker::search::compare_names;
use psgc_picker::{
    AddressPicker, AddressValue, AnyNode, Level, Lookup, PartialSelection, PickerConfig, Resolver,
    SelectionError, SelectionState,
};
use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

fn names(nodes: &[AnyNode]) -> Vec<String> {
    nodes.iter().map(|n| n.name().to_string()).collect()
}

fn pick(picker: &mut AddressPicker, level: Level, name: &str) {
    let node = picker
        .candidates(level)
        .into_iter()
        .find(|n| n.name() == name)
        .unwrap_or_else(|| panic!("{} not offered at {}", name, level));
    picker.select(node).unwrap();
}

#[test]
fn test_reselecting_region_clears_everything_below() {
    ensure_env_logger_initialized();
    let mut picker = AddressPicker::new(Arc::new(Resolver::bundled()), &PickerConfig::default());

    pick(&mut picker, Level::Region, "National Capital Region");
    pick(&mut picker, Level::Province, "NCR, Second District");
    pick(&mut picker, Level::City, "Quezon City");
    pick(&mut picker, Level::Barangay, "Cubao");

    pick(&mut picker, Level::Region, "Region VII (Central Visayas)");

    let state = picker.state();
    assert_eq!(state.region().map(|r| r.code.as_str()), Some("07"));
    assert!(state.province().is_none());
    assert!(state.city().is_none());
    assert!(state.barangay().is_none());
    assert_eq!(
        picker.value(),
        AddressValue {
            region: "Region VII (Central Visayas)".to_string(),
            ..Default::default()
        }
    );
    assert_eq!(picker.candidates_lookup(Level::City), Lookup::NotApplicable);
}

#[test]
fn test_typing_narrows_city_list() {
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &PickerConfig::default());
    pick(&mut picker, Level::Region, "National Capital Region");
    pick(&mut picker, Level::Province, "Metro Manila");

    assert_eq!(
        names(&picker.candidates(Level::City)),
        vec!["Caloocan", "Manila", "Quezon City"]
    );

    picker.type_text(Level::City, "Que").unwrap();
    assert_eq!(picker.query(Level::City), "Que");
    assert_eq!(names(&picker.candidates(Level::City)), vec!["Quezon City"]);

    picker.type_text(Level::City, "zzz").unwrap();
    assert_eq!(picker.candidates_lookup(Level::City), Lookup::Empty);
}

#[test]
fn test_clear_all_returns_to_initial_state() {
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &PickerConfig::default());
    pick(&mut picker, Level::Region, "National Capital Region");
    pick(&mut picker, Level::Province, "Metro Manila");
    picker.type_text(Level::City, "Man").unwrap();

    picker.clear_all();

    assert_eq!(picker.state(), &SelectionState::new());
    assert!(picker.state().is_initial());
    for level in Level::ALL {
        assert_eq!(picker.query(level), "");
    }
}

#[test]
fn test_large_match_set_is_capped_and_sorted() {
    let mut picker = AddressPicker::new(resolver_for(crowded_dataset(150)), &PickerConfig::default());
    pick(&mut picker, Level::Region, "Region I (Ilocos Region)");
    pick(&mut picker, Level::Province, "Sample Province");

    picker.type_text(Level::City, "barrio").unwrap();
    let cities = picker.candidates(Level::City);
    assert_eq!(cities.len(), 100);
    assert_eq!(cities[0].name(), "Barrio 000");
    assert_eq!(cities[99].name(), "Barrio 099");
    assert!(cities
        .windows(2)
        .all(|w| compare_names(w[0].name(), w[1].name()) != Ordering::Greater));
}

#[test]
fn test_result_cap_comes_from_config() {
    let config = PickerConfig {
        result_cap: 10,
        ..Default::default()
    };
    let mut picker = AddressPicker::new(resolver_for(crowded_dataset(150)), &config);
    pick(&mut picker, Level::Region, "Region I (Ilocos Region)");
    pick(&mut picker, Level::Province, "Sample Province");
    assert_eq!(picker.candidates(Level::City).len(), 10);
}

#[test]
fn test_every_transition_notifies_the_host() {
    let seen: Arc<Mutex<Vec<AddressValue>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &PickerConfig::default())
        .on_change(move |value| sink.lock().unwrap().push(value.clone()));

    pick(&mut picker, Level::Region, "National Capital Region");
    pick(&mut picker, Level::Province, "Metro Manila");
    picker.type_text(Level::City, "Qu").unwrap();
    pick(&mut picker, Level::City, "Quezon City");
    picker.clear(Level::Province);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 5);
    assert_eq!(seen[2].city, "Qu");
    assert_eq!(
        seen[3],
        AddressValue {
            region: "National Capital Region".to_string(),
            province: "Metro Manila".to_string(),
            city: "Quezon City".to_string(),
            barangay: String::new(),
        }
    );
    assert_eq!(seen[4].province, "");
    assert_eq!(seen[4].city, "");
}

#[test]
fn test_rejected_transitions_do_not_notify() {
    let count = Arc::new(Mutex::new(0usize));
    let sink = Arc::clone(&count);
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &PickerConfig::default())
        .on_change(move |_| *sink.lock().unwrap() += 1);

    assert!(matches!(
        picker.type_text(Level::Province, "Cav"),
        Err(SelectionError::LevelLocked { .. })
    ));
    assert!(matches!(
        picker.select_code(Level::Region, "77"),
        Err(SelectionError::UnknownCode { .. })
    ));

    picker.select_code(Level::Region, "04").unwrap();
    assert!(matches!(
        picker.select_code(Level::Province, "1374"),
        Err(SelectionError::ParentMismatch { .. })
    ));
    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn test_seeded_text_does_not_unlock_lookups() {
    let initial = PartialSelection {
        region: "National Capital Region".to_string(),
        province: "Metro Manila".to_string(),
        city: "Quezon City".to_string(),
        barangay: "Cubao".to_string(),
    };
    let mut picker =
        AddressPicker::with_initial(resolver_for(metro_dataset()), &PickerConfig::default(), &initial);

    assert_eq!(picker.value(), AddressValue {
        region: initial.region.clone(),
        province: initial.province.clone(),
        city: initial.city.clone(),
        barangay: initial.barangay.clone(),
    });
    assert!(picker.state().region().is_none());
    assert_eq!(picker.candidates_lookup(Level::Province), Lookup::NotApplicable);
    assert!(picker.candidates_lookup(Level::Region).is_applicable());

    pick(&mut picker, Level::Region, "National Capital Region");
    assert_eq!(picker.value().province, "");
    assert_eq!(picker.state().cascade_violation(), None);
    assert_eq!(names(&picker.candidates(Level::Province)), vec!["Metro Manila"]);
}

#[test]
fn test_stale_selection_keeps_scoping_by_default() {
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &PickerConfig::default());
    pick(&mut picker, Level::Region, "Region IV-A (CALABARZON)");
    pick(&mut picker, Level::Province, "Cavite");

    picker.type_text(Level::Province, "Lag").unwrap();
    assert_eq!(picker.state().province().map(|p| p.code.as_str()), Some("0421"));
    assert_eq!(
        names(&picker.candidates(Level::City)),
        vec!["City of Bacoor", "City of Dasmariñas"]
    );
}

#[test]
fn test_invalidate_on_type_closes_lower_levels() {
    let config = PickerConfig {
        invalidate_on_type: true,
        ..Default::default()
    };
    let mut picker = AddressPicker::new(resolver_for(metro_dataset()), &config);
    pick(&mut picker, Level::Region, "Region IV-A (CALABARZON)");
    pick(&mut picker, Level::Province, "Cavite");
    pick(&mut picker, Level::City, "City of Dasmariñas");

    picker.type_text(Level::Province, "Lag").unwrap();
    assert!(picker.state().province().is_none());
    assert_eq!(picker.value().city, "");
    assert_eq!(picker.candidates_lookup(Level::City), Lookup::NotApplicable);
    assert_eq!(names(&picker.candidates(Level::Province)), vec!["Laguna"]);
}
