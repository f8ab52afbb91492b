use super::*;

fn parse(xml: &str) -> Result<ExperimentMetadata, ExperimentXmlError> {
    ExperimentMetadata::from_reader(xml.as_bytes())
}

#[test]
fn parses_full_descriptor() {
    let meta = parse(
        r#"<ThorImageExperiment>
             <SizeZ>3</SizeZ>
             <SizeT>1</SizeT>
             <PixelSize><X>0.103</X><Y>0.104</Y></PixelSize>
             <StepSizeZ>0.5</StepSizeZ>
             <Channels>
               <Channel><Name>ChanA</Name></Channel>
               <Channel><Name>ChanB</Name></Channel>
             </Channels>
           </ThorImageExperiment>"#,
    )
    .unwrap();

    assert_eq!(meta.size_z, Some(3));
    assert_eq!(meta.size_t, Some(1));
    assert_eq!(meta.pixel_size_x_um, Some(0.103));
    assert_eq!(meta.pixel_size_y_um, Some(0.104));
    assert_eq!(meta.step_size_z_um, Some(0.5));
    assert_eq!(
        meta.channel_names,
        Some(vec!["ChanA".to_string(), "ChanB".to_string()])
    );
}

#[test]
fn missing_elements_stay_absent() {
    let meta = parse("<Experiment><Unrelated>7</Unrelated></Experiment>").unwrap();
    assert_eq!(meta, ExperimentMetadata::default());
    assert!(meta.channel_names.is_none());
}

#[test]
fn float_typed_size_is_rounded() {
    let meta = parse("<Experiment><SizeZ>3.0</SizeZ></Experiment>").unwrap();
    assert_eq!(meta.size_z, Some(3));
}

#[test]
fn non_numeric_size_fails() {
    let err = parse("<Experiment><SizeZ>many</SizeZ></Experiment>").unwrap_err();
    assert!(matches!(err, ExperimentXmlError::InvalidValue { .. }));
}

#[test]
fn non_numeric_pixel_size_fails() {
    let err = parse("<Experiment><PixelSize><X>tiny</X></PixelSize></Experiment>").unwrap_err();
    assert!(matches!(err, ExperimentXmlError::InvalidNumber { .. }));
}

#[test]
fn malformed_xml_fails() {
    let err = parse("<Experiment><SizeZ>3</Experiment>").unwrap_err();
    assert!(matches!(err, ExperimentXmlError::Xml(_)));
}

#[test]
fn pixel_size_outside_wrapper_is_ignored() {
    // A bare <X> element that is not inside <PixelSize> is vendor noise.
    let meta = parse("<Experiment><Stage><X>12.5</X></Stage></Experiment>").unwrap();
    assert_eq!(meta.pixel_size_x_um, None);
}

#[test]
fn missing_file_is_reported() {
    let err = ExperimentMetadata::from_xml_path("/nonexistent/Experiment.xml").unwrap_err();
    assert!(matches!(err, ExperimentXmlError::MissingFile(_)));
}
