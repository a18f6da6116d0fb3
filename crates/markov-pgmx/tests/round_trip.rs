//! Writing a model and reading it back.

use markov_core::{
    Criterion, DistributionPotential, EvidenceCase, ExactDistrPotential, Network,
    NetworkType, Node, Potential, PotentialRole, TablePotential, UncertainValue, Variable,
};
use markov_pgmx::{version, IoError, PgmxReader, PgmxWriter};

fn symptom() -> Variable {
    Variable::chance("Symptom", ["absent", "mild", "severe"])
}

fn therapy() -> Variable {
    Variable::decision("Therapy", ["none", "diuretic"])
}

fn sample() -> (Network, Vec<EvidenceCase>) {
    let mut net = Network::new("round trip", NetworkType::InfluenceDiagram);
    net.comment = Some("fixture".to_string());
    net.decision_criteria.push(Criterion {
        name: "QALY".to_string(),
        unit: Some("years".to_string()),
    });
    net.agents.push("clinician".to_string());
    net.additional_properties
        .insert("author".to_string(), "ward 4".to_string());

    let mut prior = TablePotential::with_values(
        vec![symptom()],
        PotentialRole::ConditionalProbability,
        vec![0.5, 0.3, 0.2],
    )
    .unwrap();
    prior
        .set_uncertain_values(Some(vec![
            Some(UncertainValue::new("Dirichlet(5)").with_name("absent")),
            None,
            Some(UncertainValue::new("Complement(1)")),
        ]))
        .unwrap();
    let mut symptom_node = Node::new(symptom()).with_potential(Potential::Table(prior));
    symptom_node
        .additional_properties
        .insert("position".to_string(), "10,20".to_string());
    net.add_node(symptom_node).unwrap();

    let policy = TablePotential::with_values(
        vec![therapy(), symptom()],
        PotentialRole::Policy,
        vec![1.0, 0.0, 0.0, 1.0, 0.0, 1.0],
    )
    .unwrap();
    net.add_node(Node::new(therapy()).with_potential(Potential::Table(policy)))
        .unwrap();

    let qaly = Variable::utility("Quality").with_criterion("QALY");
    let utility = ExactDistrPotential::with_values(
        vec![qaly.clone(), therapy(), symptom()],
        PotentialRole::Utility,
        vec![10.0, 9.5, 7.0, 8.25, 2.0, 6.125],
    )
    .unwrap();
    net.add_node(Node::new(qaly).with_potential(Potential::ExactDistr(utility)))
        .unwrap();

    let weight = Variable::numeric("Weight", markov_core::VariableKind::Chance, 30.0, 250.0);
    let distribution = DistributionPotential::new(
        vec![weight.clone(), symptom()],
        PotentialRole::ConditionalProbability,
        "Normal",
        "muSigma",
        vec![70.0, 8.0, 74.0, 9.0, 81.5, 11.0],
    )
    .unwrap();
    net.add_node(Node::new(weight).with_potential(Potential::Distribution(distribution)))
        .unwrap();

    net.add_link("Symptom", "Therapy", true).unwrap();
    net.add_link("Symptom", "Quality", true).unwrap();
    net.add_link("Therapy", "Quality", true).unwrap();
    net.add_link("Symptom", "Weight", true).unwrap();

    let mut evidence = EvidenceCase::new();
    evidence.add_finding(&net, "Symptom", "mild").unwrap();
    evidence.add_numeric_finding(&net, "Weight", 82.5).unwrap();
    (net, vec![evidence])
}

#[test]
fn current_version_round_trips_through_a_file() {
    let (net, evidence) = sample();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    PgmxWriter::new().save(&path, &net, &evidence).unwrap();

    let model = PgmxReader::load(&path).unwrap();
    assert_eq!(model.format_version, version::CURRENT);
    assert_eq!(model.network, net);
    assert_eq!(model.evidence, evidence);
    assert_eq!(model.network.fingerprint().unwrap(), net.fingerprint().unwrap());
}

#[test]
fn restriction_is_written_only_when_it_forbids_something() {
    let (mut net, _) = sample();
    let permissive = TablePotential::with_values(
        vec![symptom(), therapy()],
        PotentialRole::Restriction,
        vec![1.0; 6],
    )
    .unwrap();
    net.set_link_restriction("Symptom", "Therapy", true, Some(permissive))
        .unwrap();
    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    assert!(!json.contains("\"restriction\""));

    let forbidding = TablePotential::with_values(
        vec![symptom(), therapy()],
        PotentialRole::Restriction,
        vec![1.0, 1.0, 1.0, 0.0, 1.0, 1.0],
    )
    .unwrap();
    net.set_link_restriction("Symptom", "Therapy", true, Some(forbidding))
        .unwrap();
    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    let model = PgmxReader::from_str(&json).unwrap();
    assert_eq!(model.network.links(), net.links());
}

#[test]
fn transposed_restriction_round_trips() {
    let (mut net, _) = sample();
    // Axes [Therapy, Symptom]: a diuretic is forbidden when the symptom is absent.
    let transposed = TablePotential::with_values(
        vec![therapy(), symptom()],
        PotentialRole::Restriction,
        vec![1.0, 0.0, 1.0, 1.0, 1.0, 1.0],
    )
    .unwrap();
    net.set_link_restriction("Symptom", "Therapy", true, Some(transposed))
        .unwrap();
    let stored = net.link("Symptom", "Therapy", true).unwrap();
    let table = stored.restriction.as_ref().unwrap();
    assert_eq!(table.variables(), &[symptom(), therapy()][..]);
    assert_eq!(table.value_at(&[0, 1]), 0.0);

    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    let model = PgmxReader::from_str(&json).unwrap();
    assert_eq!(model.network, net);
}

#[test]
fn permissive_restriction_round_trips() {
    let (mut net, _) = sample();
    let permissive = TablePotential::with_values(
        vec![therapy(), symptom()],
        PotentialRole::Restriction,
        vec![1.0; 6],
    )
    .unwrap();
    net.set_link_restriction("Symptom", "Therapy", true, Some(permissive))
        .unwrap();
    assert_eq!(net.link("Symptom", "Therapy", true).unwrap().restriction, None);

    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    let model = PgmxReader::from_str(&json).unwrap();
    assert_eq!(model.network, net);
    assert_eq!(model.network.fingerprint().unwrap(), net.fingerprint().unwrap());
}

#[test]
fn document_with_a_malformed_restriction_is_rejected() {
    let (net, _) = sample();
    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    let mut document: serde_json::Value = serde_json::from_str(&json).unwrap();
    let links = document
        .pointer_mut("/network/links")
        .and_then(serde_json::Value::as_array_mut)
        .unwrap();
    links[0]["restriction"] = serde_json::json!([1.0, 0.5, 1.0, 1.0, 1.0, 1.0]);
    let err = PgmxReader::from_str(&document.to_string()).unwrap_err();
    assert!(matches!(err, IoError::Network(_)), "{err}");
}

#[test]
fn legacy_version_drops_extensions() {
    let (net, evidence) = sample();
    let mut buffer = Vec::new();
    PgmxWriter::legacy()
        .write_to(&mut buffer, &net, &evidence)
        .unwrap();
    let model = PgmxReader::from_reader(buffer.as_slice()).unwrap();

    assert_eq!(model.format_version, version::LEGACY);
    assert!(model.network.additional_properties.is_empty());
    assert!(model.network.node_potentials("Therapy").unwrap().is_empty());
    assert!(!model.network.node_potentials("Symptom").unwrap()[0].is_uncertain());
    assert_eq!(
        model.network.node("Symptom").unwrap().additional_properties.len(),
        0
    );
    assert_eq!(model.evidence, evidence);
}

#[test]
fn missing_file_is_a_file_access_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");
    let err = PgmxReader::load(&path).unwrap_err();
    match err {
        IoError::FileAccess { path: reported, .. } => assert_eq!(reported, path),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn newer_minor_version_is_unsupported() {
    let (net, _) = sample();
    let json = PgmxWriter::new()
        .to_string(&net, &[])
        .unwrap()
        .replace("\"formatVersion\": \"1.0.0\"", "\"formatVersion\": \"1.1.0\"");
    let err = PgmxReader::from_str(&json).unwrap_err();
    assert!(matches!(err, IoError::UnsupportedVersion { .. }));
}

#[test]
fn additional_constraints_survive() {
    let mut net = Network::new("constrained", NetworkType::BayesianNetwork);
    net.add_constraint(markov_core::Constraint::NoUtilityChildren);
    net.add_node(Node::new(symptom())).unwrap();
    let json = PgmxWriter::new().to_string(&net, &[]).unwrap();
    assert!(json.contains("\"additionalConstraints\""));

    let model = PgmxReader::from_str(&json).unwrap();
    assert_eq!(
        model.network.additional_constraints(),
        vec![markov_core::Constraint::NoUtilityChildren]
    );
    assert_eq!(model.network, net);
}
