use super::{CommandCategory as C, CommandSpec};

const fn command(
    phrase: &'static str,
    aliases: &'static [&'static str],
    category: C,
    exclusive: Option<&'static str>,
) -> CommandSpec {
    CommandSpec {
        phrase,
        aliases,
        category,
        exclusive,
    }
}

const NONE: &[&str] = &[];

#[rustfmt::skip]
pub(super) const COMMANDS: [CommandSpec; 133] = [
    // R-matrix approximation
    command("REICH-MOORE FORMALISm is wanted", &["MORE ACCURATE REICHmoore", "XCT"], C::RMatrix, Some("formalism")),
    command("ORIGINAL REICH-MOORE formalism", &["CRO"], C::RMatrix, Some("formalism")),
    command("MULTILEVEL BREITWIGner is wanted", &["MLBW FORMALISM IS WAnted", "MLBW"], C::RMatrix, Some("formalism")),
    command("SINGLE LEVEL BREITWigner is wanted", &["SLBW FORMALISM IS WAnted", "SLBW"], C::RMatrix, Some("formalism")),
    command("REDUCED WIDTH AMPLITudes are used for input", NONE, C::RMatrix, Some("formalism")),
    // General
    command("UNRESOLVED RESONANCE region", &["FRITZ FROEHNERS FITACS", "FITACS"], C::General, Some("resolved-region")),
    // Parameter input mode
    command("USE NEW SPIN GROUP Format", NONE, C::ParameterInput, Some("spin-group-format")),
    command("PARTICLE PAIR DEFINItions are used", NONE, C::ParameterInput, Some("spin-group-format")),
    command("KEY-WORD PARTICLE-PAir definitions are given", NONE, C::ParameterInput, Some("spin-group-format")),
    command("QUANTUM NUMBERS ARE in parameter file", NONE, C::ParameterInput, Some("quantum-numbers")),
    command("PUT QUANTUM NUMBERS into parameter file", NONE, C::ParameterInput, Some("quantum-numbers")),
    command("SPIN OF INCIDENT PARticle is +", NONE, C::ParameterInput, Some("incident-spin")),
    command("SPIN OF INCIDENT PARticle is -", NONE, C::ParameterInput, Some("incident-spin")),
    command("USE I4 FORMAT TO REAd spin group number", NONE, C::ParameterInput, None),
    command("FLAG ALL RESONANCE Parameters", NONE, C::ParameterInput, None),
    command("RADII ARE IN KEY-WORd format", NONE, C::ParameterInput, None),
    // Data format
    command("DATA ARE IN ORIGINAL multi-style format", NONE, C::DataFormat, Some("data-format")),
    command("DATA FORMAT IS ONE Point per line", &["USE CSISRS FORMAT FOr data", "CSISRS"], C::DataFormat, Some("data-format")),
    command("USE TWENTY SIGNIFICAnt digits", &["TWENTY"], C::DataFormat, Some("data-format")),
    command("DATA ARE IN STANDARD odf format", NONE, C::DataFormat, Some("data-format")),
    command("DATA ARE IN ODF FILE", NONE, C::DataFormat, Some("data-format")),
    command("DIFFERENTIAL DATA ARe in ascii file", NONE, C::DataFormat, None),
    command("DO NOT DIVIDE DATA Into regions", NONE, C::DataFormat, Some("data-regions")),
    command("DIVIDE DATA INTO REGions with a fixed number of data points per region", NONE, C::DataFormat, Some("data-regions")),
    command("IMPLICIT DATA COVARIance is wanted", &["IDC"], C::DataFormat, Some("implicit-covariance")),
    command("USER SUPPLIED IMPLICit data covariance matrix", &["USER IDC"], C::DataFormat, Some("implicit-covariance")),
    command("PUP COVARIANCE IS IN an ascii file", NONE, C::DataFormat, None),
    command("CREATE PUP FILE FROM varied parameters used in this run", NONE, C::DataFormat, None),
    command("ADD CONSTANT TERM TO data covariance", &["ADD CONSTANT TO DATA covariance matrix"], C::DataFormat, Some("covariance-constant")),
    command("DO NOT ADD CONSTANT term to data covariance", NONE, C::DataFormat, Some("covariance-constant")),
    command("USE DEFAULT FOR CONStant term to add to data covariance", NONE, C::DataFormat, Some("covariance-constant")),
    command("USE TEN PERCENT DATA uncertainty", &["ADD TEN PERCENT DATA uncertainty"], C::DataFormat, None),
    command("DATA COVARIANCE IS Diagonal", NONE, C::DataFormat, Some("data-covariance")),
    command("DATA HAS OFF-DIAGONAl contribution to covariance matrix", NONE, C::DataFormat, Some("data-covariance")),
    command("DATA COVARIANCE FILE is named", NONE, C::DataFormat, Some("data-covariance")),
    command("FREE FORMAT DATA COVariance", NONE, C::DataFormat, Some("data-covariance")),
    // Broadening
    command("BROADENING IS WANTED", NONE, C::Broadening, Some("broadening")),
    command("BROADENING IS NOT WAnted", NONE, C::Broadening, Some("broadening")),
    // Doppler method
    command("USE FREE GAS MODEL Of doppler broadening", NONE, C::Doppler, Some("doppler")),
    command("USE LEAL-HWANG DOPPLer broadening", NONE, C::Doppler, Some("doppler")),
    command("USE MULTI-STYLE DOPPler broadening", NONE, C::Doppler, Some("doppler")),
    command("USE CRYSTAL LATTICE model of doppler broadening", NONE, C::Doppler, Some("doppler")),
    command("HIGH ENERGY GAUSSIAN approximation for Doppler broadening", NONE, C::Doppler, Some("doppler")),
    // Resolution function
    command("USER-DEFINED RESOLUtion function", NONE, C::Resolution, Some("resolution")),
    command("GEEL RESOLUTION FUNction", &["GEEL"], C::Resolution, Some("resolution")),
    command("GELINA RESOLUTION FUnction", &["GELINA"], C::Resolution, Some("resolution")),
    command("NTOF RESOLUTION FUNction", &["NTOF"], C::Resolution, Some("resolution")),
    command("RPI RESOLUTION FUNCtion", &["RPI RESOLUTION"], C::Resolution, Some("resolution")),
    command("RPI TRANSMISSION REsolution function", NONE, C::Resolution, Some("resolution")),
    command("RPI CAPTURE RESOLUTion function", NONE, C::Resolution, Some("resolution")),
    // Multiple scattering
    command("DO NOT INCLUDE SELF-shielding multiple-scattering corrections", &["NO SELF-SHIELDING ANd multiple-scattering corrections"], C::MultipleScattering, Some("scattering")),
    command("USE SELF SHIELDING Only no scattering", &["SELF SHIELD", "INCLUDE ONLY SELF SHielding and not multiple scattering"], C::MultipleScattering, Some("scattering")),
    command("USE SINGLE SCATTERINg plus self shielding", &["SINGLE"], C::MultipleScattering, Some("scattering")),
    command("INCLUDE DOUBLE SCATTering corrections", &["USE MULTIPLE SCATTERing plus single scattering", "DOUBLE", "MULTIPLE"], C::MultipleScattering, Some("scattering")),
    command("INFINITE SLAB", &["NO FINITE-SIZE CORREctions to single scattering"], C::MultipleScattering, Some("slab")),
    command("FINITE SLAB", &["FINITE SIZE CORRECTIons to single scattering"], C::MultipleScattering, Some("slab")),
    command("MAKE NEW FILE WITH Edge effects", NONE, C::MultipleScattering, Some("edge-effects")),
    command("FILE WITH EDGE EFFECts already exists", NONE, C::MultipleScattering, Some("edge-effects")),
    command("MAKE PLOT FILE OF MUltiple scattering pieces", NONE, C::MultipleScattering, None),
    command("NORMALIZE AS CROSS Section rather than yield", &["CROSS SECTION"], C::MultipleScattering, Some("normalize-as")),
    command("NORMALIZE AS YIELD Rather than cross section", &["YIELD"], C::MultipleScattering, Some("normalize-as")),
    command("NORMALIZE AS (1-E)SIgma", NONE, C::MultipleScattering, Some("normalize-as")),
    command("PRINT MULTIPLE SCATTering corrections", NONE, C::MultipleScattering, None),
    command("PREPARE INPUT FOR MOnte carlo simulation", &["MONTE CARLO"], C::MultipleScattering, None),
    command("Y2 VALUES ARE TABULAted", NONE, C::MultipleScattering, None),
    command("USE QUADRATIC INTERPolation for y1", NONE, C::MultipleScattering, Some("y1-interpolation")),
    command("USE LINEAR INTERPOLAtion for y1", NONE, C::MultipleScattering, Some("y1-interpolation")),
    command("VERSION 7.0.0 FOR Multiple scattering", &["V7"], C::MultipleScattering, None),
    command("DO NOT CALCULATE Y0", NONE, C::MultipleScattering, None),
    // Bayes control
    command("SOLVE BAYES EQUATIONs", NONE, C::Bayes, Some("bayes")),
    command("DO NOT SOLVE BAYES Equations", NONE, C::Bayes, Some("bayes")),
    command("LET SAMMY CHOOSE WHIch inversion scheme to use", NONE, C::Bayes, Some("inversion")),
    command("USE (N+V) INVERSION scheme", &["NPV"], C::Bayes, Some("inversion")),
    command("USE (I+Q) INVERSION scheme", &["IPQ"], C::Bayes, Some("inversion")),
    command("USE (M+W) INVERSION scheme", &["MPW"], C::Bayes, Some("inversion")),
    command("USE LEAST SQUARES TO define prior parameter covariance matrix", NONE, C::Bayes, None),
    command("TAKE BABY STEPS WITH least-squares method", NONE, C::Bayes, None),
    command("REMEMBER ORIGINAL PArameter values", NONE, C::Bayes, None),
    command("USE REMEMBERED ORIGInal parameter values", NONE, C::Bayes, None),
    // Output control
    command("DO NOT PRINT ANY INPut parameters", NONE, C::Output, Some("print-input")),
    command("PRINT ALL INPUT PARAmeters", NONE, C::Output, Some("print-input")),
    command("PRINT VARIED INPUT Parameters", NONE, C::Output, Some("print-input")),
    command("DO NOT PRINT INPUT Data", NONE, C::Output, Some("print-data")),
    command("PRINT INPUT DATA", &["PRINT EXPERIMENTAL Values"], C::Output, Some("print-data")),
    command("DO NOT PRINT THEORETical values", NONE, C::Output, Some("print-theory")),
    command("PRINT THEORETICAL VAlues", &["PRINT THEORETICAL CRoss sections"], C::Output, Some("print-theory")),
    command("DO NOT PRINT PARTIAL derivatives", NONE, C::Output, Some("print-derivatives")),
    command("PRINT PARTIAL DERIVAtives", NONE, C::Output, Some("print-derivatives")),
    command("SUPPRESS INTERMEDIATe printout", NONE, C::Output, Some("intermediate")),
    command("DO NOT SUPPRESS INTErmediate printout", NONE, C::Output, Some("intermediate")),
    command("DO NOT SUPPRESS ANY intermediate printout", NONE, C::Output, Some("intermediate")),
    command("DO NOT USE SHORT FORmat for output", NONE, C::Output, Some("short-format")),
    command("USE SHORT FORMAT FOR output", NONE, C::Output, Some("short-format")),
    command("DO NOT PRINT REDUCED widths", NONE, C::Output, Some("reduced-widths")),
    command("PRINT REDUCED WIDTHS", NONE, C::Output, Some("reduced-widths")),
    command("DO NOT PRINT DEBUG Info", NONE, C::Output, Some("debug")),
    command("PRINT DEBUG INFORMATion", &["DEBUG"], C::Output, Some("debug")),
    command("CHI SQUARED IS NOT Wanted", &["DO NOT PRINT LS CHI squared"], C::Output, Some("ls-chi-squared")),
    command("CHI SQUARED IS WANTEd", &["PRINT LS CHI SQUARED"], C::Output, Some("ls-chi-squared")),
    command("PRINT BAYES CHI SQUAred", NONE, C::Output, Some("bayes-chi-squared")),
    command("DO NOT PRINT BAYES Chi squared", NONE, C::Output, Some("bayes-chi-squared")),
    command("PRINT CAPTURE AREA In lpt file", NONE, C::Output, None),
    // ENDF input/output
    command("INPUT IS ENDF/B FILE 2", NONE, C::Endf, None),
    command("USE ENERGY RANGE FROm endf/b file 2", NONE, C::Endf, None),
    command("DATA ARE ENDF/B FILE", &["USE ENDF/B ENERGIES and data, with MAT=9999"], C::Endf, None),
    command("ENDF/B-VI FILE 2 IS wanted", NONE, C::Endf, None),
    command("GENERATE FILE 3 POINt-wise cross section", NONE, C::Endf, None),
    command("FILE 33 LB=1 COVARIAnce is wanted", NONE, C::Endf, None),
    // Plotting
    command("EV = UNITS ON ENERGY in plot file", NONE, C::Plotting, Some("plot-units")),
    command("KEV = UNITS ON ENERGy in plot file", NONE, C::Plotting, Some("plot-units")),
    command("MEV = UNITS ON ENERGy in plot file", NONE, C::Plotting, Some("plot-units")),
    command("DO NOT GENERATE PLOT file automatically", NONE, C::Plotting, Some("plot-file")),
    command("GENERATE PLOT FILE Automatically", NONE, C::Plotting, Some("plot-file")),
    command("PLOT UNBROADENED CROss sections", NONE, C::Plotting, None),
    // Averaging
    command("AVERAGE OVER ENERGY Ranges", NONE, C::Averaging, Some("average")),
    command("GROUP AVERAGE OVER Energy ranges", NONE, C::Averaging, Some("average")),
    command("ENERGY AVERAGE USING constant flux", NONE, C::Averaging, Some("average")),
    command("MAXWELLIAN-AVERAGED capture cross sections", NONE, C::Averaging, None),
    // Constants
    command("USE ENDF VALUES FOR constants", NONE, C::Constants, Some("constants")),
    command("USE 1995 ENDF-102 COnstant values", NONE, C::Constants, Some("constants")),
    command("USE SAMMY-K1 DEFAULTs for constants", NONE, C::Constants, Some("constants")),
    // Cross-section detail
    command("USE POLAR COORDINATes for fission widths", NONE, C::CrossSection, None),
    command("DO NOT USE S-WAVE CUtoff", NONE, C::CrossSection, Some("s-wave-cutoff")),
    command("USE S-WAVE CUTOFF", NONE, C::CrossSection, Some("s-wave-cutoff")),
    command("USE NO CUTOFFS FOR DErivatives or cross sections", NONE, C::CrossSection, Some("s-wave-cutoff")),
    command("ADD DIRECT CAPTURE Component to cross section", NONE, C::CrossSection, None),
    // Energy-grid control
    command("UNIFORM ENERGY GRID", NONE, C::EnergyGrid, Some("grid")),
    command("UNIFORM VELOCITY GRID", NONE, C::EnergyGrid, Some("grid")),
    command("UNIFORM TIME GRID", NONE, C::EnergyGrid, Some("grid")),
    command("ARTIFICIAL ENERGY GRid is needed", NONE, C::EnergyGrid, None),
    // Special and unresolved-region options
    command("RECONSTRUCT CROSS SEction from resonance parameters", NONE, C::Special, None),
    command("GENERATE Y AND W MAtrices", NONE, C::Special, Some("yw-matrices")),
    command("READ Y AND W MATRICes", NONE, C::Special, Some("yw-matrices")),
];
