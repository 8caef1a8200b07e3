/*!

This is the long-form manual for `countermeasure_maps` and the `countermeasures` command.

## Input data

The countermeasure table is a CSV file with the following columns:

| country_id | country_name | 20200123 | 20200124 | ... |
|------------|--------------|----------|----------|-----|
| FRA        | France       | 0        | 0        |     |
| NY         | New York     | 0        | 1        |     |

- `country_id` is an ISO 3166 alpha-3 code for a country, or a two-letter postal code for a state of the USA.
- every other column is a day, in the `YYYYMMDD` form. A cell holds the countermeasure level (0 to 5) or is empty.

The levels are:

| level | measures |
|-------|----------|
| 0 | No or few containment measures in place |
| 1 | Ban on public gatherings, cancellation of major events and conferences |
| 2 | Schools and universities closed |
| 3 | Non-essential shops, restaurants and bars closed |
| 4 | Night curfew / partial lockdown in place for broad population categories |
| 5 | All-day lockdown / shelter-in-place government instruction |

By default, the data is downloaded from the
[Coronavirus_CounterMeasures](https://github.com/OlivierLej/Coronavirus_CounterMeasures) repository.
The `--data` flag accepts either a URL or a local file.

An optional reference table of ISO 3166 codes (`--iso-codes`) is used to report the countries that would
not be found on the map.

## Commands

### `render`

Builds the map for one day and writes it as a plotly figure (JSON). With `--html`, a standalone page
with the map and its legend is written instead.

```bash
countermeasures render --date 2020-04-01 --palette viridis --out map.json
```

When `--date` is not provided, the current day is used, or the latest day of the data if the current day
is not available yet.

### `frames`

Writes one figure per day, up to `--until`, in the output directory. The files are named
`countermeasures_<date>.json`. If `--raster-command` is provided, the command is run for each frame to
produce `countermeasures_<date>.png`. The strings `{input}` and `{output}` are replaced by the paths of
the figure and of the image.

### `animate`

Assembles all the `countermeasures_<date>.png` images of a directory into `countermeasures_<projection>.gif`,
in the order of the dates, with 200 milliseconds per frame. The animation loops forever.

### `dates`, `palettes`

List the days available in the data and the palettes that can be used.

## Configuration file

All the options can also be provided in a JSON file with `--config`. The options on the command line take
precedence.

```json
{
  "dataSources": {
    "countermeasures": "https://raw.githubusercontent.com/OlivierLej/Coronavirus_CounterMeasures/master/dataset.csv",
    "isoCodes": "https://raw.githubusercontent.com/lukes/ISO-3166-Countries-with-Regional-Codes/master/all/all.csv"
  },
  "outputSettings": {
    "outputDirectory": "frames",
    "palette": "Shikari",
    "projection": "natural earth",
    "until": "2020-07-30"
  }
}
```

*/
