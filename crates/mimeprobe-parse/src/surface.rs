//! Registration of parser entry points with the contract harness.

use mimeprobe_contract::{
    bytes_arg, int_arg, options_arg, text_arg, ArgumentError, EntryPoint, InvocationError,
    ParameterInfo, ParameterType, TypeSurface,
};

use crate::address::{GroupAddress, InternetAddress, InternetAddressList, MailboxAddress};
use crate::content::{ContentDisposition, ContentType};
use crate::error::ParseError;
use crate::options::ParserOptions;
use crate::MimeParse;

const OPTIONS: ParameterInfo = ParameterInfo::new("options", ParameterType::Options);
const BUFFER: ParameterInfo = ParameterInfo::new("buffer", ParameterType::Bytes);
const START_INDEX: ParameterInfo = ParameterInfo::new("start_index", ParameterType::Int);
const LENGTH: ParameterInfo = ParameterInfo::new("length", ParameterType::Int);
const TEXT: ParameterInfo = ParameterInfo::new("text", ParameterType::Text);

fn settle<T>(result: Result<T, ParseError>) -> Result<(), InvocationError> {
    result.map(|_| ()).map_err(InvocationError::target)
}

/// Every public entry point of `T`, in declaration order.
pub fn parse_surface<T>() -> TypeSurface<ParserOptions>
where
    T: MimeParse + 'static,
{
    TypeSurface::new(T::TYPE_NAME)
        .with_entry_point(EntryPoint::new(
            "parse_with_options_range",
            vec![OPTIONS, BUFFER, START_INDEX, LENGTH],
            |args| {
                settle(T::parse_with_options_range(
                    options_arg(args, 0)?,
                    bytes_arg(args, 1)?,
                    int_arg(args, 2)?,
                    int_arg(args, 3)?,
                ))
            },
        ))
        .with_entry_point(EntryPoint::new(
            "parse_range",
            vec![BUFFER, START_INDEX, LENGTH],
            |args| {
                settle(T::parse_range(
                    bytes_arg(args, 0)?,
                    int_arg(args, 1)?,
                    int_arg(args, 2)?,
                ))
            },
        ))
        .with_entry_point(EntryPoint::new(
            "parse_with_options_from",
            vec![OPTIONS, BUFFER, START_INDEX],
            |args| {
                settle(T::parse_with_options_from(
                    options_arg(args, 0)?,
                    bytes_arg(args, 1)?,
                    int_arg(args, 2)?,
                ))
            },
        ))
        .with_entry_point(EntryPoint::new(
            "parse_from",
            vec![BUFFER, START_INDEX],
            |args| settle(T::parse_from(bytes_arg(args, 0)?, int_arg(args, 1)?)),
        ))
        .with_entry_point(EntryPoint::new(
            "parse_with_options_bytes",
            vec![OPTIONS, BUFFER],
            |args| {
                settle(T::parse_with_options_bytes(
                    options_arg(args, 0)?,
                    bytes_arg(args, 1)?,
                ))
            },
        ))
        .with_entry_point(EntryPoint::new("parse_bytes", vec![BUFFER], |args| {
            settle(T::parse_bytes(bytes_arg(args, 0)?))
        }))
        .with_entry_point(EntryPoint::new(
            "parse_with_options_str",
            vec![OPTIONS, TEXT],
            |args| {
                settle(T::parse_with_options_str(
                    options_arg(args, 0)?,
                    text_arg(args, 1)?,
                ))
            },
        ))
        .with_entry_point(EntryPoint::new("parse_str", vec![TEXT], |args| {
            settle(T::parse_str(text_arg(args, 0)?))
        }))
        .with_entry_point(EntryPoint::new("try_parse_str", vec![TEXT], |args| {
            let text = text_arg(args, 0)?
                .ok_or_else(|| InvocationError::target(ArgumentError::missing("text")))?;
            T::try_parse_str(text).map(|_| ()).ok_or_else(|| {
                InvocationError::target(ParseError::syntax(0, "not a valid header value"))
            })
        }))
}

/// Surfaces for every parser type in this crate.
pub fn reference_surfaces() -> Vec<TypeSurface<ParserOptions>> {
    vec![
        parse_surface::<GroupAddress>(),
        parse_surface::<MailboxAddress>(),
        parse_surface::<InternetAddress>(),
        parse_surface::<InternetAddressList>(),
        parse_surface::<ContentDisposition>(),
        parse_surface::<ContentType>(),
    ]
}

#[cfg(test)]
mod tests {
    use mimeprobe_contract::{
        discover_operations, invoke, run_parse_contract, run_parse_contracts, ArgValue,
        BufferKind, Observation, ProbeConfig, RoleKind,
    };

    use super::{parse_surface, reference_surfaces};
    use crate::address::MailboxAddress;
    use crate::content::ContentType;
    use crate::options::ParserOptions;

    #[test]
    fn unit_discovery_lists_parse_entry_points_in_declaration_order() {
        let surface = parse_surface::<ContentType>();
        let descriptors = discover_operations(&surface).expect("discover");
        let names = descriptors
            .iter()
            .map(|descriptor| descriptor.name)
            .collect::<Vec<_>>();
        assert_eq!(
            names,
            vec![
                "parse_with_options_range",
                "parse_range",
                "parse_with_options_from",
                "parse_from",
                "parse_with_options_bytes",
                "parse_bytes",
                "parse_with_options_str",
                "parse_str",
            ]
        );
    }

    #[test]
    fn unit_discovery_classifies_roles_and_buffer_kind() {
        let surface = parse_surface::<MailboxAddress>();
        let descriptors = discover_operations(&surface).expect("discover");
        let ranged = &descriptors[0];
        assert_eq!(ranged.type_name, "MailboxAddress");
        assert_eq!(ranged.buffer_kind, BufferKind::Binary);
        assert!(ranged.role(RoleKind::Options).is_some());
        assert_eq!(
            ranged.role(RoleKind::Length).map(|role| role.name),
            Some("length")
        );
        let text = descriptors
            .iter()
            .find(|descriptor| descriptor.name == "parse_str")
            .expect("parse_str");
        assert_eq!(text.buffer_kind, BufferKind::Textual);
        assert!(text.role(RoleKind::Options).is_none());
    }

    #[test]
    fn functional_single_surface_passes_every_probe() {
        let report = run_parse_contract(
            &parse_surface::<MailboxAddress>(),
            &ProbeConfig::default(),
        );
        let summary = report.summary();
        assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
        assert_eq!(summary.fatal, 0);
        assert!(summary.total > 8);
    }

    #[test]
    fn integration_reference_surfaces_honor_the_argument_contract() {
        let surfaces = reference_surfaces();
        assert_eq!(surfaces.len(), 6);
        let report = run_parse_contracts(&surfaces, &ProbeConfig::default());
        assert!(report.is_success(), "{:?}", report.failures().collect::<Vec<_>>());
    }

    #[test]
    fn functional_try_parse_entry_point_reports_content_failures() {
        let surface = parse_surface::<MailboxAddress>();
        let entry_point = surface
            .entry_points
            .iter()
            .find(|entry_point| entry_point.name == "try_parse_str")
            .expect("registered");
        let call = |text: &str| {
            let args = vec![ArgValue::<ParserOptions>::Text(Some(text.to_string()))];
            invoke(|| entry_point.call(&args))
        };
        assert_eq!(call("jane.doe@example.com"), Observation::Completed);
        assert!(matches!(call("postmaster"), Observation::Failed { .. }));
    }
}
