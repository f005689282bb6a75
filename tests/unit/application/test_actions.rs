use b1_client::application::actions::NamedAction;
use reqwest::Method;

#[test]
fn business_partners_spec() {
    let spec = NamedAction::BusinessPartners.spec();

    assert_eq!(spec.method, Method::GET);
    assert_eq!(spec.url, "BusinessPartners");
    assert_eq!(
        spec.params,
        vec![("$select".to_string(), "CardCode,CardType".to_string())]
    );
    assert!(spec.data.is_none());
}

#[test]
fn named_action_round_trips_through_its_name() {
    let action: NamedAction = "getBusinessPartners".parse().unwrap();
    assert_eq!(action, NamedAction::BusinessPartners);
    assert_eq!(action.to_string(), "getBusinessPartners");
    assert!("oooo".parse::<NamedAction>().is_err());
}
