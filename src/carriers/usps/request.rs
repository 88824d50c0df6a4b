use super::codes::{ALL_SERVICES, CONTAINERS, DEFAULT_BOX_NAME, FIRST_CLASS, FIRST_CLASS_MAIL_TYPES};
use crate::domain::model::{Package, Shipment};
use crate::domain::options::{PackageOptions, RateOptions};
use crate::utils::error::BuildError;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), BuildError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn zip5(postal_code: Option<&str>) -> String {
    postal_code.unwrap_or_default().trim().chars().take(5).collect()
}

/// Service 欄位：服務代碼（未指定時 ALL），再加上 HFP / COMMERCIAL 後綴
fn service_name(base: &str, options: &PackageOptions, commercial_pricing: bool) -> String {
    let mut service = base.to_string();
    if options.hold_for_pickup {
        service.push_str(" HFP");
    }
    if commercial_pricing {
        service.push_str(" COMMERCIAL");
    }
    service
}

fn write_package<W: Write>(
    writer: &mut Writer<W>,
    index: usize,
    package: &Package,
    shipment: &Shipment,
    options: &RateOptions,
) -> Result<(), BuildError> {
    let package_options = options.packages.options_for(&package.id);
    let base_service = options
        .shipping_method
        .as_ref()
        .map(|method| method.service_code.as_str())
        .unwrap_or(ALL_SERVICES);
    let container = CONTAINERS.resolve(
        package_options.box_name.as_deref().unwrap_or(DEFAULT_BOX_NAME),
        &package.id,
    )?;

    let mut element = BytesStart::new("Package");
    element.push_attribute(("ID", index.to_string().as_str()));
    writer.write_event(Event::Start(element))?;

    write_text(
        writer,
        "Service",
        &service_name(base_service, package_options, options.commercial_pricing),
    )?;
    if base_service == FIRST_CLASS || base_service == ALL_SERVICES {
        if let Some(mail_type) = &package_options.first_class_mail_type {
            let mail_type = FIRST_CLASS_MAIL_TYPES.resolve(mail_type, &package.id)?;
            write_text(writer, "FirstClassMailType", mail_type.code)?;
        }
    }
    write_text(writer, "ZipOrigination", &zip5(shipment.origin.postal_code.as_deref()))?;
    write_text(writer, "ZipDestination", &zip5(shipment.destination.postal_code.as_deref()))?;
    write_text(writer, "Pounds", "0")?;
    write_text(
        writer,
        "Ounces",
        &format!("{:.2}", package.total_weight().to_ounces()),
    )?;
    write_text(writer, "Container", container.code)?;

    let dimensions = package.dimensions();
    let (width, length, height) = (
        dimensions.width.to_inches(),
        dimensions.length.to_inches(),
        dimensions.height.to_inches(),
    );
    write_text(writer, "Width", &format!("{:.2}", width))?;
    write_text(writer, "Length", &format!("{:.2}", length))?;
    write_text(writer, "Height", &format!("{:.2}", height))?;
    if container.symbol == "nonrectangular" {
        write_text(writer, "Girth", &format!("{:.2}", 2.0 * (width + height)))?;
    }
    write_text(
        writer,
        "Machinable",
        if package_options.machinable.unwrap_or(true) { "true" } else { "false" },
    )?;
    if let Some(ship_date) = options.ship_date {
        write_text(writer, "ShipDate", &ship_date.format("%Y-%m-%d").to_string())?;
    }

    writer.write_event(Event::End(BytesEnd::new("Package")))?;
    Ok(())
}

/// RateV4Request 文件（Revision 2，每個包裹一個 Package 節點，ID 為索引）
pub fn rate_request_document(shipment: &Shipment, options: &RateOptions, login: &str) -> Result<String, BuildError> {
    options.packages.check_against(shipment)?;

    let mut writer = Writer::new(Vec::new());
    let mut root = BytesStart::new("RateV4Request");
    root.push_attribute(("USERID", login));
    writer.write_event(Event::Start(root))?;
    write_text(&mut writer, "Revision", "2")?;
    for (index, package) in shipment.packages.iter().enumerate() {
        write_package(&mut writer, index, package, shipment, options)?;
    }
    writer.write_event(Event::End(BytesEnd::new("RateV4Request")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| {
        BuildError::XmlWrite(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    })
}
